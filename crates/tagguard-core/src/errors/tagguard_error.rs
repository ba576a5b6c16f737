use super::error_code::{self, ErrorCode};
use super::{BackendError, ConfigError, EnumerationError, FetchError, SetupError, WriteError};

/// Umbrella error for every fallible tagguard entry point.
#[derive(Debug, thiserror::Error)]
pub enum TagguardError {
    #[error(transparent)]
    Enumeration(#[from] EnumerationError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for TagguardError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl TagguardError {
    /// Setup and configuration errors abort the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Setup(_) | Self::Config(_))
    }
}

impl ErrorCode for TagguardError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Enumeration(e) => e.error_code(),
            Self::Fetch(e) => e.error_code(),
            Self::Write(e) => e.error_code(),
            Self::Setup(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::Backend(e) => e.error_code(),
            Self::Report { .. } => error_code::REPORT_ERROR,
            Self::Io(_) => error_code::IO_ERROR,
            Self::Serialization(_) => error_code::REPORT_ERROR,
        }
    }
}

pub type TagguardResult<T> = Result<T, TagguardError>;
