use crate::error::Result;
use crate::render::Rgb;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Buttons on the satellite module.
pub const SATELLITE_KEYS: usize = 4;

/// Raw access to the 4-button satellite module on the shared bus.
///
/// Every method may fail with `PadError::Transport`.
pub trait SatelliteBus {
    fn connect(&mut self, address: u8) -> Result<()>;
    /// Port bitmask; buttons sit on pins 4-7 and read low when pressed.
    fn read_bulk(&mut self) -> Result<u8>;
    fn write_pixel(&mut self, index: usize, color: Rgb) -> Result<()>;
    fn write_brightness(&mut self, level: f32) -> Result<()>;
}

/// Address, retry pacing and loss threshold for the satellite link.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SatellitePolicy {
    pub address: u8,
    pub reconnect_interval: Duration,
    pub failure_threshold: u32,
}

impl Default for SatellitePolicy {
    fn default() -> Self {
        Self {
            address: 0x30,
            reconnect_interval: Duration::from_secs(5),
            failure_threshold: 3,
        }
    }
}

/// Decode the bulk read: button `i` is pressed when bit `i + 4` is low.
pub fn keys_from_bulk(bits: u8) -> [bool; SATELLITE_KEYS] {
    std::array::from_fn(|i| bits & (1 << (i + 4)) == 0)
}

/// Connection-tracking wrapper that never lets a bus failure reach the loop.
///
/// Reads degrade to "nothing pressed" while the module is unreachable;
/// pixel and brightness writes are best-effort and never change the
/// connection state.
#[derive(Debug)]
pub struct Satellite<B> {
    bus: B,
    policy: SatellitePolicy,
    connected: bool,
    consecutive_failures: u32,
    last_attempt: Instant,
    brightness: Option<f32>,
}

impl<B: SatelliteBus> Satellite<B> {
    /// Try to connect once. A failure leaves the manager disconnected.
    pub fn connect(bus: B, policy: SatellitePolicy, now: Instant) -> Self {
        let mut satellite = Self {
            bus,
            policy,
            connected: false,
            consecutive_failures: 0,
            last_attempt: now,
            brightness: None,
        };
        satellite.try_connect(now);
        satellite
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Current button states, all false while disconnected.
    ///
    /// A disconnected manager retries at most once per reconnect interval;
    /// the call that reconnects still reports nothing pressed.
    pub fn read_keys(&mut self, now: Instant) -> [bool; SATELLITE_KEYS] {
        if !self.connected {
            if now.saturating_duration_since(self.last_attempt) >= self.policy.reconnect_interval
            {
                self.try_connect(now);
            }
            return [false; SATELLITE_KEYS];
        }

        match self.bus.read_bulk() {
            Ok(bits) => {
                self.consecutive_failures = 0;
                keys_from_bulk(bits)
            }
            Err(e) => {
                self.consecutive_failures += 1;
                debug!(
                    "satellite read failed ({}/{}): {e}",
                    self.consecutive_failures, self.policy.failure_threshold
                );
                if self.consecutive_failures >= self.policy.failure_threshold {
                    warn!(
                        "satellite lost after {} failed reads, retrying every {:?}",
                        self.consecutive_failures, self.policy.reconnect_interval
                    );
                    self.connected = false;
                    self.last_attempt = now;
                }
                [false; SATELLITE_KEYS]
            }
        }
    }

    /// Best-effort pixel write. Returns true only if the write landed.
    pub fn set_pixel(&mut self, index: usize, color: Rgb) -> bool {
        if !self.connected {
            return false;
        }
        match self.bus.write_pixel(index, color) {
            Ok(()) => true,
            Err(e) => {
                debug!("satellite pixel {index} write failed: {e}");
                false
            }
        }
    }

    /// Apply `level` now if connected; it is reapplied after a reconnect.
    pub fn set_brightness(&mut self, level: f32) {
        self.brightness = Some(level);
        if !self.connected {
            return;
        }
        if let Err(e) = self.bus.write_brightness(level) {
            debug!("satellite brightness write failed: {e}");
        }
    }

    fn try_connect(&mut self, now: Instant) {
        self.last_attempt = now;
        match self.bus.connect(self.policy.address) {
            Ok(()) => {
                info!("satellite connected at {:#04x}", self.policy.address);
                self.connected = true;
                self.consecutive_failures = 0;
                if let Some(level) = self.brightness {
                    if let Err(e) = self.bus.write_brightness(level) {
                        debug!("satellite brightness restore failed: {e}");
                    }
                }
            }
            Err(e) => {
                debug!("satellite connect at {:#04x} failed: {e}", self.policy.address);
                self.connected = false;
            }
        }
    }
}
