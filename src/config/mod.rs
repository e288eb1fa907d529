pub mod loader;
pub mod schema;

pub use loader::load_applications;

use crate::error::{PadError, Result};
use schema::PadConfig;
use std::path::Path;

/// Load and parse configuration from a TOML file.
///
/// # Errors
/// Returns `PadError::ConfigNotFound` if the file doesn't exist,
/// `PadError::Io` on read errors, `PadError::TomlParse` on syntax errors,
/// or `PadError::Config` on validation failures.
pub fn load(path: &Path) -> Result<PadConfig> {
    if !path.exists() {
        return Err(PadError::ConfigNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

/// Expand `${VAR}` and `$VAR` patterns in the config string.
fn expand_env_vars(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' {
            if chars.peek() == Some(&'{') {
                chars.next(); // consume '{'
                let var_name: String = chars.by_ref().take_while(|&c| c != '}').collect();
                if let Ok(val) = std::env::var(&var_name) {
                    result.push_str(&val);
                } else {
                    // Keep original if env var not found
                    use std::fmt::Write;
                    let _ = write!(result, "${{{var_name}}}");
                }
            } else {
                let var_name: String = chars
                    .by_ref()
                    .take_while(|c| c.is_alphanumeric() || *c == '_')
                    .collect();
                if var_name.is_empty() {
                    result.push('$');
                } else if let Ok(val) = std::env::var(&var_name) {
                    result.push_str(&val);
                } else {
                    result.push('$');
                    result.push_str(&var_name);
                }
            }
        } else {
            result.push(ch);
        }
    }

    result
}

/// Parse config text after env var expansion, then validate it.
///
/// # Errors
/// Returns `PadError::TomlParse` on syntax errors or `PadError::Config` on
/// validation failures.
pub fn parse(content: &str) -> Result<PadConfig> {
    let content = expand_env_vars(content);
    let config: PadConfig = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Validate config constraints.
fn validate(config: &PadConfig) -> Result<()> {
    let brightness = config.pad.brightness;
    if !(0.0..=1.0).contains(&brightness) {
        return Err(PadError::Config(format!(
            "brightness {brightness} out of range (0.0-1.0)"
        )));
    }

    if config.pad.poll_interval_ms == 0 {
        return Err(PadError::Config("poll_interval_ms must be at least 1".to_string()));
    }

    if config.pad.marquee.interval_ms == 0 {
        return Err(PadError::Config(
            "marquee interval_ms must be at least 1".to_string(),
        ));
    }

    if config.satellite.address > 0x7F {
        return Err(PadError::Config(format!(
            "satellite address {:#x} is not a 7-bit address",
            config.satellite.address
        )));
    }

    if config.satellite.failure_threshold == 0 {
        return Err(PadError::Config(
            "satellite failure_threshold must be at least 1".to_string(),
        ));
    }

    Ok(())
}
