pub mod color;

use crate::device::DisplaySurface;
use std::time::Duration;
use tokio::time::Instant;

pub use color::Rgb;

/// Number of labelled keys on the grid (3 columns × 4 rows).
pub const GRID_KEYS: usize = 12;

/// Appended to the title while the satellite module is unreachable.
pub const OFFLINE_MARKER: &str = " *";

/// Shown instead of an application name when nothing could be loaded.
pub const NO_APPLICATIONS_TITLE: &str = "NO MACRO FILES FOUND";

/// Compose the title label for an application.
pub fn title_text(name: &str, satellite_connected: bool) -> String {
    if satellite_connected {
        name.to_string()
    } else {
        format!("{name}{OFFLINE_MARKER}")
    }
}

/// Replace the title with the empty-folder notice and redraw.
pub fn show_no_applications<D: DisplaySurface + ?Sized>(display: &mut D) {
    display.set_title(NO_APPLICATIONS_TITLE);
    display.set_title_offset(0);
    display.refresh();
}

/// Horizontal scroll of the title label.
#[derive(Debug)]
pub struct Marquee {
    step: i32,
    interval: Duration,
    last_move: Instant,
}

impl Marquee {
    pub fn new(step: i32, interval: Duration, now: Instant) -> Self {
        Self {
            step,
            interval,
            last_move: now,
        }
    }

    /// Advance the title once per interval. Returns true when it moved.
    pub fn tick<D: DisplaySurface + ?Sized>(&mut self, display: &mut D, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_move) < self.interval {
            return false;
        }

        let mut x = display.title_offset() + self.step;
        if x > display.width() {
            x = -display.title_width();
        }
        display.set_title_offset(x);
        display.refresh();
        self.last_move = now;
        true
    }
}
