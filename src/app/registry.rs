use super::Application;
use crate::device::satellite::SatelliteBus;
use crate::device::{DisplaySurface, OutputDevice, Peripherals};
use crate::error::{PadError, Result};
use crate::render::{title_text, Rgb, GRID_KEYS};
use tracing::info;

/// Loaded applications and which one the encoder has selected.
#[derive(Debug)]
pub struct Registry {
    apps: Vec<Application>,
    active: usize,
}

impl Registry {
    /// # Errors
    /// Returns `PadError::NoApplications` if `apps` is empty.
    pub fn new(apps: Vec<Application>) -> Result<Self> {
        if apps.is_empty() {
            return Err(PadError::NoApplications);
        }
        Ok(Self { apps, active: 0 })
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> &Application {
        &self.apps[self.active]
    }

    /// Application index for an encoder position, wrapping in both directions.
    pub fn index_for(&self, position: i64) -> usize {
        position.rem_euclid(self.apps.len() as i64) as usize
    }

    /// Make the application at `position mod N` active: relabel and recolor
    /// the grid, retitle, and release every held output.
    pub fn switch_to<O, D, B>(&mut self, position: i64, hw: &mut Peripherals<O, D, B>) -> usize
    where
        O: OutputDevice,
        D: DisplaySurface,
        B: SatelliteBus,
    {
        let index = self.index_for(position);
        self.active = index;
        let app = &self.apps[index];
        info!("switch: {} (position {position} → {index})", app.name);

        for slot in 0..GRID_KEYS {
            match app.macros.get(slot) {
                Some(m) => {
                    hw.display.set_label(slot, &m.label);
                    hw.display.set_key_color(slot, m.color);
                }
                None => {
                    hw.display.set_label(slot, "");
                    hw.display.set_key_color(slot, Rgb::BLACK);
                }
            }
        }
        hw.display
            .set_title(&title_text(&app.name, hw.satellite.is_connected()));
        hw.reset_outputs();
        hw.display.refresh();
        index
    }
}
