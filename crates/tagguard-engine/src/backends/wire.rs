//! Versioned JSON envelope spoken by the tagging gateway.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tagguard_core::errors::{error_code, BackendError};
use tagguard_core::models::TagPayload;
use tagguard_core::ResourceType;

pub const PROTOCOL_VERSION: &str = "1.0";

pub const LIST_RESOURCES_PATH: &str = "/v1/resources/list";
pub const GET_TAGS_PATH: &str = "/v1/tags/get";
pub const PUT_TAGS_PATH: &str = "/v1/tags/put";

/// Envelope for every gateway request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayRequest<T> {
    pub version: String,
    /// Unique per request, echoed back for tracing.
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    pub payload: T,
}

impl<T> GatewayRequest<T> {
    pub fn new(payload: T) -> Self {
        Self {
            version: PROTOCOL_VERSION.to_string(),
            request_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            payload,
        }
    }
}

/// Envelope for every gateway response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))]
pub struct GatewayResponse<T> {
    pub version: String,
    pub request_id: String,
    pub success: bool,
    #[serde(default)]
    pub error: Option<GatewayError>,
    #[serde(default)]
    pub data: Option<T>,
}

/// Error body of a failed response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayError {
    /// One of the `error_code` constants.
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub attempted: Option<usize>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl GatewayError {
    pub fn into_backend_error(self) -> BackendError {
        match self.code.as_str() {
            error_code::ACCESS_DENIED => BackendError::AccessDenied { reason: self.message },
            error_code::NOT_FOUND => BackendError::NotFound { resource: self.message },
            error_code::THROTTLED => BackendError::Throttled { reason: self.message },
            error_code::TIMEOUT => BackendError::Timeout { elapsed_ms: 0 },
            error_code::TRANSIENT => BackendError::Transient { reason: self.message },
            error_code::LIMIT_EXCEEDED => BackendError::TagLimitExceeded {
                attempted: self.attempted.unwrap_or_default(),
                limit: self.limit.unwrap_or_default(),
            },
            error_code::INVALID_TAG => BackendError::InvalidTag { reason: self.message },
            error_code::UNSUPPORTED => BackendError::Unsupported {
                resource_type: self.message,
            },
            _ => BackendError::Protocol {
                reason: format!("[{}] {}", self.code, self.message),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResourcesRequest {
    pub resource_type: ResourceType,
    pub region: String,
    pub next_token: Option<String>,
    pub page_size: usize,
}

/// Identifies the resource whose tags are read or written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceRef {
    pub resource_type: ResourceType,
    pub resource_id: String,
    pub resource_arn: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutTagsRequest {
    #[serde(flatten)]
    pub resource: ResourceRef,
    /// Tags in the resource type's native shape.
    pub tags: TagPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutTagsResponse {
    pub applied: usize,
}
