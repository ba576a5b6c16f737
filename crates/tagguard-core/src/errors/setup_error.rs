use super::error_code::{self, ErrorCode};

/// Fatal errors raised before any resource is processed.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("no region given: pass --region or set TAGGUARD_REGION")]
    MissingRegion,

    #[error("no credentials available: {hint}")]
    MissingCredentials { hint: String },

    #[error("inventory file not found: {path}")]
    InventoryNotFound { path: String },

    #[error("inventory file {path} is invalid: {message}")]
    InventoryParse { path: String, message: String },

    #[error("invalid tag argument '{argument}': {reason}")]
    InvalidTagArgument { argument: String, reason: String },

    #[error("cannot open report {path}: {reason}")]
    ReportOutput { path: String, reason: String },

    #[error("backend unavailable: {reason}")]
    Backend { reason: String },
}

impl ErrorCode for SetupError {
    fn error_code(&self) -> &'static str {
        error_code::SETUP_ERROR
    }
}
