use crate::device::satellite::SatellitePolicy;
use crate::render::Rgb;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PadConfig {
    #[serde(default)]
    pub pad: PadSettings,
    #[serde(default)]
    pub satellite: SatelliteSettings,
}

/// Control loop settings.
#[derive(Debug, Clone, Deserialize)]
pub struct PadSettings {
    /// Folder holding one `.toml` macro set per application.
    #[serde(default = "default_macro_folder")]
    pub macro_folder: PathBuf,

    /// Indicator brightness 0.0-1.0.
    #[serde(default = "default_brightness")]
    pub brightness: f32,

    /// Seconds without input before the display and LEDs sleep.
    #[serde(default = "default_sleep_timeout")]
    pub sleep_timeout_secs: u64,

    /// Milliseconds between loop iterations.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    #[serde(default)]
    pub marquee: MarqueeSettings,
}

impl Default for PadSettings {
    fn default() -> Self {
        Self {
            macro_folder: default_macro_folder(),
            brightness: default_brightness(),
            sleep_timeout_secs: default_sleep_timeout(),
            poll_interval_ms: default_poll_interval(),
            marquee: MarqueeSettings::default(),
        }
    }
}

impl PadSettings {
    pub fn sleep_timeout(&self) -> Duration {
        Duration::from_secs(self.sleep_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Title scroll speed.
#[derive(Debug, Clone, Deserialize)]
pub struct MarqueeSettings {
    #[serde(default = "default_marquee_step")]
    pub step_px: i32,

    #[serde(default = "default_marquee_interval")]
    pub interval_ms: u64,
}

impl Default for MarqueeSettings {
    fn default() -> Self {
        Self {
            step_px: default_marquee_step(),
            interval_ms: default_marquee_interval(),
        }
    }
}

impl MarqueeSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Satellite module link settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SatelliteSettings {
    /// 7-bit bus address.
    #[serde(default = "default_satellite_address")]
    pub address: u8,

    /// Milliseconds between reconnect attempts.
    #[serde(default = "default_reconnect_interval")]
    pub reconnect_interval_ms: u64,

    /// Consecutive failed reads before the module counts as gone.
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: u32,
}

impl Default for SatelliteSettings {
    fn default() -> Self {
        Self {
            address: default_satellite_address(),
            reconnect_interval_ms: default_reconnect_interval(),
            failure_threshold: default_failure_threshold(),
        }
    }
}

impl SatelliteSettings {
    pub fn policy(&self) -> SatellitePolicy {
        SatellitePolicy {
            address: self.address,
            reconnect_interval: Duration::from_millis(self.reconnect_interval_ms),
            failure_threshold: self.failure_threshold,
        }
    }
}

// --- Macro set files ---

/// One application's macro set as written on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct MacroFile {
    pub name: String,
    #[serde(default)]
    pub macros: Vec<MacroEntry>,
}

/// One key binding: idle color, label and action sequence.
#[derive(Debug, Clone, Deserialize)]
pub struct MacroEntry {
    #[serde(default)]
    pub color: Rgb,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub sequence: Vec<RawStep>,
}

/// A sequence entry, typed only by its shape.
///
/// Integers are key codes (negative releases), floats are delays in
/// seconds, strings are typed literally, arrays are consumer-control
/// batches and tables are pointer actions or device commands.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawStep {
    Code(i64),
    Seconds(f64),
    Text(String),
    Batch(Vec<RawBatchItem>),
    Table(RawTable),
    Other(toml::Value),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawBatchItem {
    Code(i64),
    Seconds(f64),
    Other(toml::Value),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawTable {
    #[serde(default, alias = "command")]
    pub test_string: Option<String>,
    #[serde(default)]
    pub buttons: Option<i64>,
    #[serde(default)]
    pub x: Option<i64>,
    #[serde(default)]
    pub y: Option<i64>,
    #[serde(default)]
    pub wheel: Option<i64>,
    #[serde(default)]
    pub tone: Option<i64>,
    #[serde(default)]
    pub play: Option<String>,
}

// --- Defaults ---

fn default_macro_folder() -> PathBuf {
    PathBuf::from("/etc/padd/macros")
}

fn default_brightness() -> f32 {
    0.1
}

fn default_sleep_timeout() -> u64 {
    10
}

fn default_poll_interval() -> u64 {
    10
}

fn default_marquee_step() -> i32 {
    5
}

fn default_marquee_interval() -> u64 {
    1000
}

fn default_satellite_address() -> u8 {
    0x30
}

fn default_reconnect_interval() -> u64 {
    5000
}

fn default_failure_threshold() -> u32 {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let config: PadConfig = toml::from_str("[pad]\nbrightness = 0.5\n").unwrap();
        assert_eq!(config.pad.brightness, 0.5);
        assert_eq!(config.pad.sleep_timeout(), Duration::from_secs(10));
        assert_eq!(config.satellite.policy(), SatellitePolicy::default());
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
[pad]
macro_folder = "/srv/macros"
brightness = 0.3
sleep_timeout_secs = 3600
poll_interval_ms = 5

[pad.marquee]
step_px = 2
interval_ms = 250

[satellite]
address = 0x31
reconnect_interval_ms = 1000
failure_threshold = 5
"#;
        let config: PadConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.pad.macro_folder, PathBuf::from("/srv/macros"));
        assert_eq!(config.pad.poll_interval(), Duration::from_millis(5));
        assert_eq!(config.pad.marquee.step_px, 2);
        assert_eq!(config.pad.marquee.interval(), Duration::from_millis(250));
        let policy = config.satellite.policy();
        assert_eq!(policy.address, 0x31);
        assert_eq!(policy.reconnect_interval, Duration::from_secs(1));
        assert_eq!(policy.failure_threshold, 5);
    }

    #[test]
    fn steps_are_typed_by_shape() {
        let toml_str = r#"
name = "Shapes"

[[macros]]
color = 0x00FF00
label = "All"
sequence = [
    224,
    -224,
    0.25,
    "hello",
    [205, 0.1, -1],
    { buttons = 1, x = 10 },
    { test_string = "increase_brightness" },
    { command = "night_mode" },
    { bogus = 1 },
    true,
]
"#;
        let file: MacroFile = toml::from_str(toml_str).unwrap();
        let seq = &file.macros[0].sequence;
        assert!(matches!(seq[0], RawStep::Code(224)));
        assert!(matches!(seq[1], RawStep::Code(-224)));
        assert!(matches!(seq[2], RawStep::Seconds(s) if s == 0.25));
        assert!(matches!(&seq[3], RawStep::Text(t) if t == "hello"));
        assert!(matches!(&seq[4], RawStep::Batch(items) if items.len() == 3));
        assert!(matches!(&seq[5], RawStep::Table(t) if t.buttons == Some(1) && t.x == Some(10)));
        assert!(
            matches!(&seq[6], RawStep::Table(t) if t.test_string.as_deref() == Some("increase_brightness"))
        );
        assert!(
            matches!(&seq[7], RawStep::Table(t) if t.test_string.as_deref() == Some("night_mode"))
        );
        assert!(matches!(seq[8], RawStep::Other(_)));
        assert!(matches!(seq[9], RawStep::Other(_)));
    }

    #[test]
    fn macro_defaults() {
        let file: MacroFile = toml::from_str("name = \"Blank\"\n[[macros]]\n").unwrap();
        assert_eq!(file.macros[0].color, Rgb::BLACK);
        assert!(file.macros[0].label.is_empty());
        assert!(file.macros[0].sequence.is_empty());
    }
}
