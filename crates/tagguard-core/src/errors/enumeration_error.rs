use super::error_code::{self, ErrorCode};
use super::BackendError;
use crate::models::ResourceType;

/// Listing resources of one type failed. Fatal for that type only.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnumerationError {
    #[error("access denied listing {resource_type}: {reason}")]
    AccessDenied {
        resource_type: ResourceType,
        reason: String,
    },

    #[error("unsupported resource type: {resource_type}")]
    Unsupported { resource_type: String },

    #[error("listing {resource_type} failed: {cause}")]
    Backend {
        resource_type: ResourceType,
        cause: BackendError,
    },
}

impl EnumerationError {
    pub fn from_backend(resource_type: ResourceType, cause: BackendError) -> Self {
        match cause {
            BackendError::AccessDenied { reason } => Self::AccessDenied {
                resource_type,
                reason,
            },
            BackendError::Unsupported { .. } => Self::Unsupported {
                resource_type: resource_type.to_string(),
            },
            cause => Self::Backend {
                resource_type,
                cause,
            },
        }
    }

    /// Name of the resource type whose listing failed.
    pub fn resource_type_name(&self) -> String {
        match self {
            Self::AccessDenied { resource_type, .. } | Self::Backend { resource_type, .. } => {
                resource_type.to_string()
            }
            Self::Unsupported { resource_type } => resource_type.clone(),
        }
    }
}

impl ErrorCode for EnumerationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::AccessDenied { .. } => error_code::ACCESS_DENIED,
            Self::Unsupported { .. } => error_code::UNSUPPORTED,
            Self::Backend { cause, .. } => cause.error_code(),
        }
    }
}
