use super::error_code::{self, ErrorCode};
use super::BackendError;

/// Writing tags to one resource failed. Other resources in the batch are unaffected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WriteError {
    #[error("access denied tagging {resource_id}: {reason}")]
    AccessDenied { resource_id: String, reason: String },

    #[error("resource {resource_id} no longer exists")]
    NotFound { resource_id: String },

    /// The backend's per-resource tag cap would be exceeded.
    #[error("tag limit exceeded on {resource_id}: {attempted} tags, limit {limit}")]
    LimitExceeded {
        resource_id: String,
        attempted: usize,
        limit: usize,
    },

    #[error("invalid tag for {resource_id}: {reason}")]
    InvalidTag { resource_id: String, reason: String },

    #[error("tagging {resource_id} failed: {cause}")]
    Backend {
        resource_id: String,
        cause: BackendError,
    },
}

impl WriteError {
    pub fn from_backend(resource_id: &str, cause: BackendError) -> Self {
        let resource_id = resource_id.to_string();
        match cause {
            BackendError::AccessDenied { reason } => Self::AccessDenied {
                resource_id,
                reason,
            },
            BackendError::NotFound { .. } => Self::NotFound { resource_id },
            BackendError::TagLimitExceeded { attempted, limit } => Self::LimitExceeded {
                resource_id,
                attempted,
                limit,
            },
            BackendError::InvalidTag { reason } => Self::InvalidTag {
                resource_id,
                reason,
            },
            cause => Self::Backend { resource_id, cause },
        }
    }

    pub fn is_limit_exceeded(&self) -> bool {
        matches!(self, Self::LimitExceeded { .. })
    }
}

impl ErrorCode for WriteError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::AccessDenied { .. } => error_code::ACCESS_DENIED,
            Self::NotFound { .. } => error_code::NOT_FOUND,
            Self::LimitExceeded { .. } => error_code::LIMIT_EXCEEDED,
            Self::InvalidTag { .. } => error_code::INVALID_TAG,
            Self::Backend { cause, .. } => cause.error_code(),
        }
    }
}
