use crate::error::{PadError, Result};
use serde::Deserialize;
use std::fmt;

/// A 24-bit RGB indicator color, stored as `0xRRGGBB`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "ColorValue")]
pub struct Rgb(u32);

impl Rgb {
    pub const BLACK: Self = Self(0x00_0000);
    pub const RED: Self = Self(0xFF_0000);
    pub const YELLOW: Self = Self(0xFF_FF00);
    pub const GREEN: Self = Self(0x00_FF00);
    pub const CYAN: Self = Self(0x00_FFFF);

    /// Build from a packed value; bits above 24 are rejected.
    ///
    /// # Errors
    /// Returns `PadError::Config` if `value` does not fit in 24 bits.
    pub fn new(value: u32) -> Result<Self> {
        if value > 0xFF_FFFF {
            return Err(PadError::Config(format!(
                "color {value:#x} exceeds 24 bits"
            )));
        }
        Ok(Self(value))
    }

    pub const fn value(self) -> u32 {
        self.0
    }

    pub const fn channels(self) -> (u8, u8, u8) {
        ((self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

/// Parse a hex color string like "#1a1a2e" or "#fff".
///
/// # Errors
/// Returns `PadError::Config` if the hex string is malformed.
pub fn parse_hex_color(hex: &str) -> Result<Rgb> {
    let hex = hex.trim_start_matches('#');
    let parse_err = || PadError::Config(format!("invalid hex color: #{hex}"));
    if !hex.is_ascii() {
        return Err(parse_err());
    }

    let (r, g, b) = match hex.len() {
        3 => {
            let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).map_err(|_| parse_err())?;
            let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).map_err(|_| parse_err())?;
            let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).map_err(|_| parse_err())?;
            (r, g, b)
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).map_err(|_| parse_err())?;
            let g = u8::from_str_radix(&hex[2..4], 16).map_err(|_| parse_err())?;
            let b = u8::from_str_radix(&hex[4..6], 16).map_err(|_| parse_err())?;
            (r, g, b)
        }
        _ => return Err(parse_err()),
    };

    Ok(Rgb((u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)))
}

/// Colors in macro files are either packed integers or hex strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum ColorValue {
    Packed(i64),
    Hex(String),
}

impl TryFrom<ColorValue> for Rgb {
    type Error = PadError;

    fn try_from(value: ColorValue) -> Result<Self> {
        match value {
            ColorValue::Packed(v) => {
                let v = u32::try_from(v)
                    .map_err(|_| PadError::Config(format!("invalid color {v}")))?;
                Rgb::new(v)
            }
            ColorValue::Hex(s) => parse_hex_color(&s),
        }
    }
}
