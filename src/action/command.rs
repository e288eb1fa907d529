use crate::power::{Backlight, PowerManager, BRIGHTNESS_STEP};
use tracing::debug;

/// In-band device command; handled on the device, never sent to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    IncreaseBrightness,
    DecreaseBrightness,
    /// Recognised shape, no effect implemented (e.g. `night_mode`).
    Other(String),
}

impl SpecialCommand {
    pub fn parse(name: &str) -> Self {
        match name.trim() {
            "increase_brightness" => Self::IncreaseBrightness,
            "decrease_brightness" => Self::DecreaseBrightness,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Apply a command to the power manager.
pub fn dispatch<L: Backlight + ?Sized>(
    command: &SpecialCommand,
    power: &mut PowerManager,
    light: &mut L,
) {
    match command {
        SpecialCommand::IncreaseBrightness => {
            power.adjust_brightness(light, BRIGHTNESS_STEP);
        }
        SpecialCommand::DecreaseBrightness => {
            power.adjust_brightness(light, -BRIGHTNESS_STEP);
        }
        SpecialCommand::Other(name) => {
            debug!("command '{name}' has no effect");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_names() {
        assert_eq!(
            SpecialCommand::parse("increase_brightness"),
            SpecialCommand::IncreaseBrightness
        );
        assert_eq!(
            SpecialCommand::parse(" decrease_brightness "),
            SpecialCommand::DecreaseBrightness
        );
        assert_eq!(
            SpecialCommand::parse("increase_screen_brightness"),
            SpecialCommand::Other("increase_screen_brightness".into())
        );
    }
}
