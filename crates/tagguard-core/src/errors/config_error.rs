//! Errors raised while loading or validating `tagguard.toml` layers.

use super::error_code::{self, ErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An explicitly named config file does not exist.
    #[error("config file {path} does not exist")]
    FileNotFound { path: String },

    #[error("cannot read config file {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in {path}: {message}")]
    ParseError { path: String, message: String },

    /// A value parsed but is out of range, e.g. `concurrency = 0`.
    #[error("invalid setting `{field}`: {message}")]
    ValidationFailed { field: String, message: String },

    #[error("cannot serialize config: {message}")]
    Serialize { message: String },
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ValidationFailed { .. } => error_code::CONFIG_INVALID,
            _ => error_code::CONFIG_ERROR,
        }
    }
}
