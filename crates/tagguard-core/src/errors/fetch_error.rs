use super::error_code::{self, ErrorCode};
use super::BackendError;

/// Reading the tags of one resource failed. The resource is skipped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("access denied reading tags of {resource_id}: {reason}")]
    AccessDenied { resource_id: String, reason: String },

    #[error("resource {resource_id} no longer exists")]
    NotFound { resource_id: String },

    #[error("unexpected tag payload for {resource_id}: expected {expected}, got {actual}")]
    UnexpectedShape {
        resource_id: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("reading tags of {resource_id} failed: {cause}")]
    Backend {
        resource_id: String,
        cause: BackendError,
    },
}

impl FetchError {
    pub fn from_backend(resource_id: &str, cause: BackendError) -> Self {
        let resource_id = resource_id.to_string();
        match cause {
            BackendError::AccessDenied { reason } => Self::AccessDenied {
                resource_id,
                reason,
            },
            BackendError::NotFound { .. } => Self::NotFound { resource_id },
            cause => Self::Backend { resource_id, cause },
        }
    }

    pub fn resource_id(&self) -> &str {
        match self {
            Self::AccessDenied { resource_id, .. }
            | Self::NotFound { resource_id }
            | Self::UnexpectedShape { resource_id, .. }
            | Self::Backend { resource_id, .. } => resource_id,
        }
    }
}

impl ErrorCode for FetchError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::AccessDenied { .. } => error_code::ACCESS_DENIED,
            Self::NotFound { .. } => error_code::NOT_FOUND,
            Self::UnexpectedShape { .. } => error_code::UNEXPECTED_SHAPE,
            Self::Backend { cause, .. } => cause.error_code(),
        }
    }
}
