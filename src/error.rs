use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Rate source unavailable ({location}): {reason}")]
    SourceUnavailable { location: String, reason: String },

    #[error("Malformed rate document: {0}")]
    Parse(String),

    #[error("Unknown currency '{0}'")]
    UnknownCurrency(String),

    #[error("Please choose different currencies (got '{0}' twice).")]
    SameCurrency(String),

    #[error("Invalid --date value '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
