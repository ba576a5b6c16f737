use super::error_code::{self, ErrorCode};

/// Errors raised by a tagging backend for a single call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("access denied: {reason}")]
    AccessDenied { reason: String },

    #[error("resource not found: {resource}")]
    NotFound { resource: String },

    #[error("request throttled: {reason}")]
    Throttled { reason: String },

    #[error("call timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    #[error("transient backend failure: {reason}")]
    Transient { reason: String },

    #[error("tag limit exceeded: {attempted} tags requested, limit {limit}")]
    TagLimitExceeded { attempted: usize, limit: usize },

    #[error("invalid tag: {reason}")]
    InvalidTag { reason: String },

    #[error("unsupported resource type: {resource_type}")]
    Unsupported { resource_type: String },

    #[error("protocol error: {reason}")]
    Protocol { reason: String },
}

impl BackendError {
    /// Throttling-class errors are worth another attempt after a backoff.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Throttled { .. } | Self::Timeout { .. } | Self::Transient { .. }
        )
    }
}

impl ErrorCode for BackendError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::AccessDenied { .. } => error_code::ACCESS_DENIED,
            Self::NotFound { .. } => error_code::NOT_FOUND,
            Self::Throttled { .. } => error_code::THROTTLED,
            Self::Timeout { .. } => error_code::TIMEOUT,
            Self::Transient { .. } => error_code::TRANSIENT,
            Self::TagLimitExceeded { .. } => error_code::LIMIT_EXCEEDED,
            Self::InvalidTag { .. } => error_code::INVALID_TAG,
            Self::Unsupported { .. } => error_code::UNSUPPORTED,
            Self::Protocol { .. } => error_code::PROTOCOL_ERROR,
        }
    }
}
