//! Headless backend: outputs are logged and input is read from stdin.
//!
//! Input lines:
//!
//! ```text
//! down N | up N | tap N    grid key transitions
//! turn D                   move the encoder by D detents
//! push | lift              encoder button
//! ```

use super::satellite::SatelliteBus;
use super::{DisplaySurface, InputSource, OutputDevice};
use crate::error::{PadError, Result};
use crate::event::KeyEvent;
use crate::render::{Rgb, GRID_KEYS};
use std::collections::VecDeque;
use std::path::Path;
use std::io::BufRead;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Width of the OLED in pixels.
pub const DISPLAY_WIDTH: i32 = 128;

/// Glyph advance of the built-in font.
const GLYPH_WIDTH: i32 = 6;

#[derive(Debug, Default)]
pub struct ConsoleOutput;

impl OutputDevice for ConsoleOutput {
    fn press(&mut self, code: u16) {
        info!("key press {code:#04x}");
    }
    fn release(&mut self, code: u16) {
        info!("key release {code:#04x}");
    }
    fn release_all(&mut self) {
        debug!("release all keys");
    }
    fn type_text(&mut self, text: &str) {
        info!("type {text:?}");
    }
    fn consumer_press(&mut self, code: u16) {
        info!("consumer press {code:#04x}");
    }
    fn consumer_release(&mut self) {
        debug!("consumer release");
    }
    fn pointer_press(&mut self, buttons: u8) {
        info!("pointer press {buttons:#04b}");
    }
    fn pointer_release(&mut self, buttons: u8) {
        info!("pointer release {buttons:#04b}");
    }
    fn pointer_release_all(&mut self) {
        debug!("pointer release all");
    }
    fn pointer_move(&mut self, dx: i32, dy: i32, wheel: i32) {
        info!("pointer move x={dx} y={dy} wheel={wheel}");
    }
    fn start_tone(&mut self, frequency: u32) {
        info!("tone {frequency} Hz");
    }
    fn stop_tone(&mut self) {
        debug!("tone off");
    }
    fn play_audio(&mut self, path: &Path) {
        info!("play {}", path.display());
    }
}

/// Keeps the display model in memory and logs it on refresh.
#[derive(Debug)]
pub struct ConsoleDisplay {
    labels: Vec<String>,
    colors: Vec<Rgb>,
    title: String,
    title_offset: i32,
    asleep: bool,
}

impl Default for ConsoleDisplay {
    fn default() -> Self {
        Self {
            labels: vec![String::new(); GRID_KEYS],
            colors: vec![Rgb::BLACK; GRID_KEYS],
            title: String::new(),
            title_offset: 0,
            asleep: false,
        }
    }
}

impl DisplaySurface for ConsoleDisplay {
    fn set_label(&mut self, slot: usize, text: &str) {
        if let Some(label) = self.labels.get_mut(slot) {
            text.clone_into(label);
        }
    }

    fn set_key_color(&mut self, slot: usize, color: Rgb) {
        if let Some(c) = self.colors.get_mut(slot) {
            *c = color;
        }
    }

    fn set_title(&mut self, text: &str) {
        text.clone_into(&mut self.title);
    }

    fn set_title_offset(&mut self, x: i32) {
        self.title_offset = x;
    }

    fn title_offset(&self) -> i32 {
        self.title_offset
    }

    fn title_width(&self) -> i32 {
        self.title.chars().count() as i32 * GLYPH_WIDTH
    }

    fn width(&self) -> i32 {
        DISPLAY_WIDTH
    }

    fn refresh(&mut self) {
        if self.asleep {
            debug!("display asleep");
            return;
        }
        let grid: Vec<String> = self
            .labels
            .iter()
            .zip(&self.colors)
            .map(|(label, color)| format!("{label}({color})"))
            .collect();
        debug!(
            title = %self.title,
            offset = self.title_offset,
            "display [{}]",
            grid.join(" | ")
        );
    }

    fn set_sleep(&mut self, asleep: bool) {
        self.asleep = asleep;
    }

    fn is_asleep(&self) -> bool {
        self.asleep
    }

    fn set_indicator_brightness(&mut self, level: f32) {
        debug!("indicator brightness {level:.2}");
    }
}

/// Bus for a pad with nothing wired to the satellite port.
#[derive(Debug, Default)]
pub struct DetachedBus;

impl SatelliteBus for DetachedBus {
    fn connect(&mut self, address: u8) -> Result<()> {
        Err(PadError::Transport(format!("no device at {address:#04x}")))
    }

    fn read_bulk(&mut self) -> Result<u8> {
        Err(PadError::Transport("bus detached".into()))
    }

    fn write_pixel(&mut self, _index: usize, _color: Rgb) -> Result<()> {
        Err(PadError::Transport("bus detached".into()))
    }

    fn write_brightness(&mut self, _level: f32) -> Result<()> {
        Err(PadError::Transport("bus detached".into()))
    }
}

/// One parsed stdin line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    Key(KeyEvent),
    Tap(usize),
    Turn(i64),
    Push,
    Lift,
}

impl ConsoleCommand {
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let verb = words.next()?;
        let arg = words.next();
        if words.next().is_some() {
            return None;
        }

        let key = || arg.and_then(|a| a.parse::<usize>().ok());
        match (verb, arg) {
            ("down", _) => key().map(|k| Self::Key(KeyEvent::pressed(k))),
            ("up", _) => key().map(|k| Self::Key(KeyEvent::released(k))),
            ("tap", _) => key().map(Self::Tap),
            ("turn", Some(d)) => d.parse().ok().map(Self::Turn),
            ("push", None) => Some(Self::Push),
            ("lift", None) => Some(Self::Lift),
            _ => None,
        }
    }
}

/// Encoder and key state fed by [`spawn_stdin_reader`].
#[derive(Debug)]
pub struct ConsoleInput {
    rx: mpsc::UnboundedReceiver<ConsoleCommand>,
    position: i64,
    encoder_pressed: bool,
    pending: VecDeque<KeyEvent>,
}

impl ConsoleInput {
    pub fn new(rx: mpsc::UnboundedReceiver<ConsoleCommand>) -> Self {
        Self {
            rx,
            position: 0,
            encoder_pressed: false,
            pending: VecDeque::new(),
        }
    }

    fn drain(&mut self) {
        while let Ok(command) = self.rx.try_recv() {
            match command {
                ConsoleCommand::Key(event) => self.pending.push_back(event),
                ConsoleCommand::Tap(key) => {
                    self.pending.push_back(KeyEvent::pressed(key));
                    self.pending.push_back(KeyEvent::released(key));
                }
                ConsoleCommand::Turn(delta) => self.position = self.position.wrapping_add(delta),
                ConsoleCommand::Push => self.encoder_pressed = true,
                ConsoleCommand::Lift => self.encoder_pressed = false,
            }
        }
    }
}

impl InputSource for ConsoleInput {
    fn encoder_position(&mut self) -> i64 {
        self.drain();
        self.position
    }

    fn encoder_pressed(&mut self) -> bool {
        self.drain();
        self.encoder_pressed
    }

    fn next_key_event(&mut self) -> Option<KeyEvent> {
        self.drain();
        self.pending.pop_front()
    }
}

/// Forward stdin commands to `tx` from a dedicated thread.
///
/// The thread is never joined: it ends on EOF, on a read error, or on the
/// first line after the receiver is dropped. A blocking read on stdin cannot
/// be cancelled, so it must not hold up runtime shutdown.
///
/// # Errors
/// Returns `PadError::Io` if the thread cannot be spawned.
pub fn spawn_stdin_reader(tx: mpsc::UnboundedSender<ConsoleCommand>) -> Result<()> {
    std::thread::Builder::new()
        .name("padd-stdin".into())
        .spawn(move || forward_lines(std::io::stdin().lock(), &tx))?;
    Ok(())
}

fn forward_lines<R: BufRead>(reader: R, tx: &mpsc::UnboundedSender<ConsoleCommand>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("console input error: {e}");
                return;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match ConsoleCommand::parse(&line) {
            Some(command) => {
                if tx.send(command).is_err() {
                    return;
                }
            }
            None => warn!("unknown input {line:?}"),
        }
    }
    debug!("stdin closed");
}
