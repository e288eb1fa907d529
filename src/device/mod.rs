pub mod console;
#[cfg(test)]
pub mod mock;
pub mod satellite;

use crate::event::KeyEvent;
use crate::power::Backlight;
use crate::render::Rgb;
use satellite::{Satellite, SatelliteBus};
use std::path::Path;
use tracing::debug;

/// Keystroke, media-control, pointer and audio output.
///
/// Calls are fire-and-forget; implementations report their own failures.
pub trait OutputDevice {
    fn press(&mut self, code: u16);
    fn release(&mut self, code: u16);
    fn release_all(&mut self);
    fn type_text(&mut self, text: &str);
    fn consumer_press(&mut self, code: u16);
    fn consumer_release(&mut self);
    fn pointer_press(&mut self, buttons: u8);
    fn pointer_release(&mut self, buttons: u8);
    fn pointer_release_all(&mut self);
    fn pointer_move(&mut self, dx: i32, dy: i32, wheel: i32);
    fn start_tone(&mut self, frequency: u32);
    fn stop_tone(&mut self);
    fn play_audio(&mut self, path: &Path);
}

/// The OLED plus the 12 key indicators under it.
pub trait DisplaySurface {
    fn set_label(&mut self, slot: usize, text: &str);
    fn set_key_color(&mut self, slot: usize, color: Rgb);
    fn set_title(&mut self, text: &str);
    fn set_title_offset(&mut self, x: i32);
    fn title_offset(&self) -> i32;
    /// Rendered width of the current title in pixels.
    fn title_width(&self) -> i32;
    /// Display width in pixels.
    fn width(&self) -> i32;
    fn refresh(&mut self);
    fn set_sleep(&mut self, asleep: bool);
    fn is_asleep(&self) -> bool;
    fn set_indicator_brightness(&mut self, level: f32);
}

/// Encoder, encoder push-button and the grid's key event queue.
pub trait InputSource {
    /// Absolute encoder position; unbounded in both directions.
    fn encoder_position(&mut self) -> i64;
    fn encoder_pressed(&mut self) -> bool;
    /// At most one queued key transition per call.
    fn next_key_event(&mut self) -> Option<KeyEvent>;
}

/// Everything the loop writes to, owned together so the consumer-code latch
/// always sees every consumer press.
pub struct Peripherals<O, D, B> {
    pub output: O,
    pub display: D,
    pub satellite: Satellite<B>,
    consumer_held: Option<u16>,
}

impl<O: OutputDevice, D: DisplaySurface, B: SatelliteBus> Peripherals<O, D, B> {
    pub fn new(output: O, display: D, satellite: Satellite<B>) -> Self {
        Self {
            output,
            display,
            satellite,
            consumer_held: None,
        }
    }

    /// Assert a consumer code, releasing whichever one is currently held.
    pub fn consumer_press(&mut self, code: u16) {
        if let Some(previous) = self.consumer_held.take() {
            debug!("consumer {previous:#x} replaced by {code:#x}");
            self.output.consumer_release();
        }
        self.output.consumer_press(code);
        self.consumer_held = Some(code);
    }

    pub fn consumer_release(&mut self) {
        self.output.consumer_release();
        self.consumer_held = None;
    }

    pub fn consumer_held(&self) -> Option<u16> {
        self.consumer_held
    }

    /// Release every key, pointer button, tone and consumer code.
    pub fn reset_outputs(&mut self) {
        self.output.release_all();
        self.output.pointer_release_all();
        self.output.stop_tone();
        self.consumer_release();
    }
}

impl<O, D: DisplaySurface, B: SatelliteBus> Backlight for Peripherals<O, D, B> {
    fn set_brightness(&mut self, level: f32) {
        self.display.set_indicator_brightness(level);
        self.satellite.set_brightness(level);
    }

    fn set_display_sleep(&mut self, asleep: bool) {
        self.display.set_sleep(asleep);
        self.display.refresh();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mock::{peripherals, OutputCall};

    #[test]
    fn consumer_codes_never_stack() {
        let mut hw = peripherals(true);
        hw.consumer_press(0xE9);
        hw.consumer_press(0xEA);
        assert_eq!(
            hw.output.calls,
            vec![
                OutputCall::ConsumerPress(0xE9),
                OutputCall::ConsumerRelease,
                OutputCall::ConsumerPress(0xEA),
            ]
        );
        assert_eq!(hw.consumer_held(), Some(0xEA));
    }

    #[test]
    fn reset_clears_everything() {
        let mut hw = peripherals(true);
        hw.consumer_press(0xCD);
        hw.output.calls.clear();
        hw.reset_outputs();
        assert_eq!(
            hw.output.calls,
            vec![
                OutputCall::ReleaseAll,
                OutputCall::PointerReleaseAll,
                OutputCall::StopTone,
                OutputCall::ConsumerRelease,
            ]
        );
        assert_eq!(hw.consumer_held(), None);
    }

    #[test]
    fn backlight_reaches_both_indicator_sets() {
        let mut hw = peripherals(true);
        hw.set_brightness(0.4);
        assert_eq!(hw.display.indicator_brightness, 0.4);
        assert_eq!(hw.satellite.bus().brightness_writes, vec![0.4]);

        hw.set_display_sleep(true);
        assert!(hw.display.is_asleep());
    }
}
