use serde::{Serialize, Serializer};

use super::{ResourceDescriptor, TagSet};
use crate::errors::{ErrorCode, FetchError, WriteError};

/// Per-resource state of a remediation batch.
///
/// `Pending → Fetching → Writing → Done | Failed`. A fetch failure moves
/// straight from `Fetching` to `Failed`; a resource with nothing to write
/// moves from `Fetching` to `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchState {
    Pending,
    Fetching,
    Writing,
    Done,
    Failed,
}

impl BatchState {
    pub fn can_transition_to(self, next: BatchState) -> bool {
        use BatchState::*;
        matches!(
            (self, next),
            (Pending, Fetching)
                | (Pending, Failed)
                | (Fetching, Writing)
                | (Fetching, Done)
                | (Fetching, Failed)
                | (Writing, Done)
                | (Writing, Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fetching => "fetching",
            Self::Writing => "writing",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

/// Why remediating one resource failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemediationError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error("cancelled before {resource_id} was processed")]
    Cancelled { resource_id: String },
}

impl RemediationError {
    pub fn is_write_error(&self) -> bool {
        matches!(self, Self::Write(_))
    }

    pub fn is_limit_exceeded(&self) -> bool {
        matches!(self, Self::Write(e) if e.is_limit_exceeded())
    }
}

impl ErrorCode for RemediationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Fetch(e) => e.error_code(),
            Self::Write(e) => e.error_code(),
            Self::Cancelled { .. } => "CANCELLED",
        }
    }
}

/// Result of one remediation attempt on one resource.
#[derive(Debug, Clone, Serialize)]
pub struct RemediationOutcome {
    pub resource: ResourceDescriptor,
    /// Tags written (or, on a dry run, that would have been written).
    /// Always empty when `success` is false.
    pub applied_tags: TagSet,
    /// Write set that was rejected or never sent. Empty on success.
    #[serde(skip_serializing_if = "TagSet::is_empty")]
    pub attempted_tags: TagSet,
    pub success: bool,
    #[serde(serialize_with = "serialize_error")]
    pub error: Option<RemediationError>,
    pub state: BatchState,
    pub dry_run: bool,
}

impl RemediationOutcome {
    pub fn done(resource: ResourceDescriptor, applied_tags: TagSet, dry_run: bool) -> Self {
        Self {
            resource,
            applied_tags,
            attempted_tags: TagSet::new(),
            success: true,
            error: None,
            state: BatchState::Done,
            dry_run,
        }
    }

    pub fn failed(
        resource: ResourceDescriptor,
        attempted_tags: TagSet,
        error: RemediationError,
        dry_run: bool,
    ) -> Self {
        Self {
            resource,
            applied_tags: TagSet::new(),
            attempted_tags,
            success: false,
            error: Some(error),
            state: BatchState::Failed,
            dry_run,
        }
    }

    /// Error rendered for reports: `[CODE] message`, or empty.
    pub fn error_string(&self) -> String {
        self.error
            .as_ref()
            .map(|e| e.coded_string())
            .unwrap_or_default()
    }
}

fn serialize_error<S: Serializer>(
    error: &Option<RemediationError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match error {
        Some(e) => serializer.serialize_some(&e.coded_string()),
        None => serializer.serialize_none(),
    }
}
