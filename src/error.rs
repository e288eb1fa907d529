use std::path::PathBuf;

/// Central error type for padd.
#[derive(Debug, thiserror::Error)]
pub enum PadError {
    #[error("config error: {0}")]
    Config(String),

    #[error("config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("macro file {path}: {message}")]
    MacroFile { path: PathBuf, message: String },

    #[error("no macro files found")]
    NoApplications,

    #[error("bus transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PadError>;
