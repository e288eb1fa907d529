//! Recording fakes for the collaborator traits.

use super::satellite::{Satellite, SatelliteBus, SatellitePolicy, SATELLITE_KEYS};
use super::{DisplaySurface, InputSource, OutputDevice, Peripherals};
use crate::error::{PadError, Result};
use crate::event::KeyEvent;
use crate::render::{Rgb, GRID_KEYS};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq)]
pub enum OutputCall {
    Press(u16),
    Release(u16),
    ReleaseAll,
    TypeText(String),
    ConsumerPress(u16),
    ConsumerRelease,
    PointerPress(u8),
    PointerRelease(u8),
    PointerReleaseAll,
    PointerMove(i32, i32, i32),
    StartTone(u32),
    StopTone,
    PlayAudio(PathBuf),
}

#[derive(Debug, Default)]
pub struct MockOutput {
    pub calls: Vec<OutputCall>,
}

impl OutputDevice for MockOutput {
    fn press(&mut self, code: u16) {
        self.calls.push(OutputCall::Press(code));
    }
    fn release(&mut self, code: u16) {
        self.calls.push(OutputCall::Release(code));
    }
    fn release_all(&mut self) {
        self.calls.push(OutputCall::ReleaseAll);
    }
    fn type_text(&mut self, text: &str) {
        self.calls.push(OutputCall::TypeText(text.to_string()));
    }
    fn consumer_press(&mut self, code: u16) {
        self.calls.push(OutputCall::ConsumerPress(code));
    }
    fn consumer_release(&mut self) {
        self.calls.push(OutputCall::ConsumerRelease);
    }
    fn pointer_press(&mut self, buttons: u8) {
        self.calls.push(OutputCall::PointerPress(buttons));
    }
    fn pointer_release(&mut self, buttons: u8) {
        self.calls.push(OutputCall::PointerRelease(buttons));
    }
    fn pointer_release_all(&mut self) {
        self.calls.push(OutputCall::PointerReleaseAll);
    }
    fn pointer_move(&mut self, dx: i32, dy: i32, wheel: i32) {
        self.calls.push(OutputCall::PointerMove(dx, dy, wheel));
    }
    fn start_tone(&mut self, frequency: u32) {
        self.calls.push(OutputCall::StartTone(frequency));
    }
    fn stop_tone(&mut self) {
        self.calls.push(OutputCall::StopTone);
    }
    fn play_audio(&mut self, path: &Path) {
        self.calls.push(OutputCall::PlayAudio(path.to_path_buf()));
    }
}

#[derive(Debug)]
pub struct MockDisplay {
    pub labels: Vec<String>,
    pub colors: Vec<Rgb>,
    pub title: String,
    pub title_offset: i32,
    pub width: i32,
    pub refreshes: usize,
    pub asleep: bool,
    pub indicator_brightness: f32,
}

impl MockDisplay {
    pub fn new(width: i32) -> Self {
        Self {
            labels: vec![String::new(); GRID_KEYS],
            colors: vec![Rgb::BLACK; GRID_KEYS],
            title: String::new(),
            title_offset: 0,
            width,
            refreshes: 0,
            asleep: false,
            indicator_brightness: 0.0,
        }
    }
}

impl DisplaySurface for MockDisplay {
    fn set_label(&mut self, slot: usize, text: &str) {
        self.labels[slot] = text.to_string();
    }
    fn set_key_color(&mut self, slot: usize, color: Rgb) {
        self.colors[slot] = color;
    }
    fn set_title(&mut self, text: &str) {
        self.title = text.to_string();
    }
    fn set_title_offset(&mut self, x: i32) {
        self.title_offset = x;
    }
    fn title_offset(&self) -> i32 {
        self.title_offset
    }
    fn title_width(&self) -> i32 {
        self.title.len() as i32 * 6
    }
    fn width(&self) -> i32 {
        self.width
    }
    fn refresh(&mut self) {
        self.refreshes += 1;
    }
    fn set_sleep(&mut self, asleep: bool) {
        self.asleep = asleep;
    }
    fn is_asleep(&self) -> bool {
        self.asleep
    }
    fn set_indicator_brightness(&mut self, level: f32) {
        self.indicator_brightness = level;
    }
}

/// Satellite bus whose reachability is flipped by the test.
#[derive(Debug, Default)]
pub struct MockBus {
    pub online: bool,
    pub writes_fail: bool,
    pub pressed: [bool; SATELLITE_KEYS],
    pub connect_attempts: usize,
    pub pixel_writes: Vec<(usize, Rgb)>,
    pub brightness_writes: Vec<f32>,
}

impl MockBus {
    pub fn online() -> Self {
        Self {
            online: true,
            ..Self::default()
        }
    }

    pub fn offline() -> Self {
        Self::default()
    }

    fn check(&self, what: &str) -> Result<()> {
        if self.online {
            Ok(())
        } else {
            Err(PadError::Transport(format!("{what}: no ack")))
        }
    }
}

impl SatelliteBus for MockBus {
    fn connect(&mut self, _address: u8) -> Result<()> {
        self.connect_attempts += 1;
        self.check("connect")
    }

    fn read_bulk(&mut self) -> Result<u8> {
        self.check("read")?;
        let mut bits = 0xF0u8;
        for (i, &down) in self.pressed.iter().enumerate() {
            if down {
                bits &= !(1 << (i + 4));
            }
        }
        Ok(bits)
    }

    fn write_pixel(&mut self, index: usize, color: Rgb) -> Result<()> {
        self.check("pixel")?;
        if self.writes_fail {
            return Err(PadError::Transport("pixel: nack".into()));
        }
        self.pixel_writes.push((index, color));
        Ok(())
    }

    fn write_brightness(&mut self, level: f32) -> Result<()> {
        self.check("brightness")?;
        if self.writes_fail {
            return Err(PadError::Transport("brightness: nack".into()));
        }
        self.brightness_writes.push(level);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MockInput {
    pub position: i64,
    pub encoder_pressed: bool,
    pub events: VecDeque<KeyEvent>,
}

impl InputSource for MockInput {
    fn encoder_position(&mut self) -> i64 {
        self.position
    }
    fn encoder_pressed(&mut self) -> bool {
        self.encoder_pressed
    }
    fn next_key_event(&mut self) -> Option<KeyEvent> {
        self.events.pop_front()
    }
}

pub type MockPeripherals = Peripherals<MockOutput, MockDisplay, MockBus>;

pub fn peripherals(satellite_online: bool) -> MockPeripherals {
    let bus = if satellite_online {
        MockBus::online()
    } else {
        MockBus::offline()
    };
    let satellite = Satellite::connect(bus, SatellitePolicy::default(), Instant::now());
    Peripherals::new(MockOutput::default(), MockDisplay::new(128), satellite)
}
