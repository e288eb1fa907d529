use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

/// Step used by the brightness special commands.
pub const BRIGHTNESS_STEP: f32 = 0.1;

/// Where brightness and the sleep flag are applied.
pub trait Backlight {
    /// Set the primary and satellite indicator brightness.
    fn set_brightness(&mut self, level: f32);
    fn set_display_sleep(&mut self, asleep: bool);
}

/// Applied brightness and sleep flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceState {
    pub brightness: f32,
    pub asleep: bool,
}

/// Inactivity sleep and brightness owner.
///
/// The remembered level is what a wake restores; it follows every explicit
/// adjustment, so a sleep/wake cycle never falls back to the startup default.
#[derive(Debug)]
pub struct PowerManager {
    state: DeviceState,
    remembered: f32,
}

impl PowerManager {
    pub fn new(initial_brightness: f32) -> Self {
        let level = initial_brightness.clamp(0.0, 1.0);
        Self {
            state: DeviceState {
                brightness: level,
                asleep: false,
            },
            remembered: level,
        }
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    pub fn is_asleep(&self) -> bool {
        self.state.asleep
    }

    /// Level a wake will restore.
    pub fn remembered_brightness(&self) -> f32 {
        self.remembered
    }

    /// Leave sleep if needed. Always returns `now` as the new activity baseline.
    pub fn wake<L: Backlight + ?Sized>(&mut self, light: &mut L, now: Instant) -> Instant {
        if self.state.asleep {
            info!("waking display, brightness {:.2}", self.remembered);
            self.state = DeviceState {
                brightness: self.remembered,
                asleep: false,
            };
            light.set_brightness(self.remembered);
            light.set_display_sleep(false);
        }
        now
    }

    pub fn sleep<L: Backlight + ?Sized>(&mut self, light: &mut L) {
        if self.state.asleep {
            return;
        }
        info!("putting display to sleep");
        self.remembered = self.state.brightness;
        self.state = DeviceState {
            brightness: 0.0,
            asleep: true,
        };
        light.set_brightness(0.0);
        light.set_display_sleep(true);
    }

    /// Sleep once `timeout` has elapsed since `last_activity`. Returns true
    /// only on the call that put the device to sleep.
    pub fn check_idle<L: Backlight + ?Sized>(
        &mut self,
        light: &mut L,
        last_activity: Instant,
        timeout: Duration,
        now: Instant,
    ) -> bool {
        if self.state.asleep || now.saturating_duration_since(last_activity) < timeout {
            return false;
        }
        self.sleep(light);
        true
    }

    /// Clamp `brightness + delta` into `[0, 1]` and make it the remembered
    /// level. While asleep the change is held back until the next wake.
    pub fn adjust_brightness<L: Backlight + ?Sized>(&mut self, light: &mut L, delta: f32) -> f32 {
        let base = if self.state.asleep {
            self.remembered
        } else {
            self.state.brightness
        };
        let level = (base + delta).clamp(0.0, 1.0);
        self.remembered = level;

        if self.state.asleep {
            debug!("brightness {level:.2} deferred until wake");
        } else {
            debug!("brightness {level:.2}");
            self.state.brightness = level;
            light.set_brightness(level);
        }
        level
    }
}
