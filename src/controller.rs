use crate::action::Interpreter;
use crate::app::registry::Registry;
use crate::app::{Application, ENCODER_KEY};
use crate::config::schema::PadSettings;
use crate::debounce::Debouncer;
use crate::device::satellite::{SatelliteBus, SATELLITE_KEYS};
use crate::device::{DisplaySurface, InputSource, OutputDevice, Peripherals};
use crate::error::Result;
use crate::keycode::{consumer, key};
use crate::power::{Backlight, PowerManager};
use crate::render::{title_text, Marquee, Rgb};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

/// What a satellite button sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SatelliteAction {
    /// Tap a keyboard key.
    Key(u16),
    /// Pulse a consumer-control code.
    Consumer(u16),
}

pub const SATELLITE_ACTIONS: [SatelliteAction; SATELLITE_KEYS] = [
    SatelliteAction::Key(key::ESCAPE),
    SatelliteAction::Consumer(consumer::VOLUME_INCREMENT),
    SatelliteAction::Consumer(consumer::VOLUME_DECREMENT),
    SatelliteAction::Consumer(consumer::PLAY_PAUSE),
];

/// Satellite pixel color on the iteration a button goes down.
pub const SATELLITE_ACTIVE_COLORS: [Rgb; SATELLITE_KEYS] = [Rgb::RED, Rgb::YELLOW, Rgb::GREEN, Rgb::CYAN];

pub const SATELLITE_IDLE_COLOR: Rgb = Rgb::RED;

/// How an iteration ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// No key or encoder-button event.
    Idle,
    /// An event arrived for a key with no macro in the active application.
    Unbound,
    /// A macro phase ran.
    Executed { key: usize, pressed: bool },
}

/// One control loop: owns the managers and the injected collaborators.
pub struct Controller<O, D, I, B> {
    hw: Peripherals<O, D, B>,
    input: I,
    registry: Registry,
    power: PowerManager,
    interpreter: Interpreter,
    satellite_buttons: [Debouncer; SATELLITE_KEYS],
    satellite_pixels: [Option<Rgb>; SATELLITE_KEYS],
    satellite_was_connected: bool,
    encoder_button: Debouncer,
    last_position: Option<i64>,
    last_activity: Instant,
    sleep_timeout: Duration,
    marquee: Marquee,
}

impl<O, D, I, B> Controller<O, D, I, B>
where
    O: OutputDevice,
    D: DisplaySurface,
    I: InputSource,
    B: SatelliteBus,
{
    /// # Errors
    /// Returns `PadError::NoApplications` if `apps` is empty.
    pub fn new(
        apps: Vec<Application>,
        mut hw: Peripherals<O, D, B>,
        input: I,
        settings: &PadSettings,
        now: Instant,
    ) -> Result<Self> {
        let mut registry = Registry::new(apps)?;
        let power = PowerManager::new(settings.brightness);
        hw.set_brightness(power.state().brightness);
        registry.switch_to(0, &mut hw);

        Ok(Self {
            satellite_was_connected: hw.satellite.is_connected(),
            hw,
            input,
            registry,
            power,
            interpreter: Interpreter::new(),
            satellite_buttons: [Debouncer::new(); SATELLITE_KEYS],
            satellite_pixels: [None; SATELLITE_KEYS],
            encoder_button: Debouncer::new(),
            last_position: None,
            last_activity: now,
            sleep_timeout: settings.sleep_timeout(),
            marquee: Marquee::new(
                settings.marquee.step_px,
                settings.marquee.interval(),
                now,
            ),
        })
    }

    pub fn peripherals(&self) -> &Peripherals<O, D, B> {
        &self.hw
    }

    pub fn peripherals_mut(&mut self) -> &mut Peripherals<O, D, B> {
        &mut self.hw
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn power(&self) -> &PowerManager {
        &self.power
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    /// Run one loop iteration. Only a macro with delays takes noticeable time.
    pub async fn step(&mut self, now: Instant) -> Step {
        self.poll_satellite(now);
        self.marquee.tick(&mut self.hw.display, now);
        self.power
            .check_idle(&mut self.hw, self.last_activity, self.sleep_timeout, now);
        self.track_satellite_link();

        let position = self.input.encoder_position();
        if self.last_position != Some(position) {
            self.registry.switch_to(position, &mut self.hw);
            self.last_position = Some(position);
            self.last_activity = self.power.wake(&mut self.hw, now);
        }

        self.encoder_button.update(self.input.encoder_pressed());
        let (key, pressed) = if self.encoder_button.changed() {
            self.last_activity = self.power.wake(&mut self.hw, now);
            if !self.registry.active().has_encoder_macro() {
                return Step::Unbound;
            }
            (ENCODER_KEY, self.encoder_button.state())
        } else {
            match self.input.next_key_event() {
                None => return Step::Idle,
                Some(event) if event.key >= self.registry.active().macros.len() => {
                    debug!("{event}: no macro in '{}'", self.registry.active().name);
                    return Step::Unbound;
                }
                Some(event) => (event.key, event.pressed),
            }
        };

        self.last_activity = self.power.wake(&mut self.hw, now);
        let Some(binding) = self.registry.active().macro_for(key) else {
            return Step::Unbound;
        };
        self.interpreter
            .execute(key, binding, pressed, &mut self.hw, &mut self.power)
            .await;
        Step::Executed { key, pressed }
    }

    fn poll_satellite(&mut self, now: Instant) {
        let keys = self.hw.satellite.read_keys(now);
        let mut consumer_pressed = false;

        for (i, (&down, button)) in keys.iter().zip(&mut self.satellite_buttons).enumerate() {
            button.update(down);
            let color = if button.is_pressed() {
                debug!("satellite button {i} pressed");
                match SATELLITE_ACTIONS[i] {
                    SatelliteAction::Key(code) => {
                        self.hw.output.press(code);
                        self.hw.output.release_all();
                    }
                    SatelliteAction::Consumer(code) => {
                        self.hw.consumer_press(code);
                        consumer_pressed = true;
                    }
                }
                SATELLITE_ACTIVE_COLORS[i]
            } else {
                SATELLITE_IDLE_COLOR
            };

            if self.satellite_pixels[i] != Some(color) && self.hw.satellite.set_pixel(i, color) {
                self.satellite_pixels[i] = Some(color);
            }
        }

        if consumer_pressed {
            self.hw.consumer_release();
        }
    }

    fn track_satellite_link(&mut self) {
        let connected = self.hw.satellite.is_connected();
        if connected == self.satellite_was_connected {
            return;
        }
        self.satellite_was_connected = connected;
        // Pixel state on the module is unknown after a reconnect.
        self.satellite_pixels = [None; SATELLITE_KEYS];

        let name = &self.registry.active().name;
        info!(
            "satellite {}",
            if connected { "online" } else { "offline" }
        );
        self.hw.display.set_title(&title_text(name, connected));
        self.hw.display.refresh();
    }
}
