//! Structured log events for key engine operations.
//!
//! Each function emits a `tracing` event with structured fields.

use crate::models::{ComplianceResult, ResourceDescriptor, TagSet};

/// Log a completed compliance evaluation.
pub fn resource_audited(result: &ComplianceResult) {
    tracing::debug!(
        event = "resource_audited",
        resource_type = %result.resource.resource_type,
        resource_id = %result.resource.resource_id,
        compliant = result.compliant,
        missing = %result.missing_tags_joined(),
        "resource audited"
    );
}

/// Log a resource that could not be checked.
pub fn resource_skipped(resource: &ResourceDescriptor, code: &str, reason: &str) {
    tracing::warn!(
        event = "resource_skipped",
        resource_type = %resource.resource_type,
        resource_id = %resource.resource_id,
        code = %code,
        reason = %reason,
        "resource skipped"
    );
}

/// Log a resource type whose listing failed.
pub fn enumeration_failed(resource_type: &str, code: &str, reason: &str) {
    tracing::error!(
        event = "enumeration_failed",
        resource_type = %resource_type,
        code = %code,
        reason = %reason,
        "enumeration failed"
    );
}

/// Log a successful (or planned, on dry runs) tag write.
pub fn tags_applied(resource: &ResourceDescriptor, tags: &TagSet, dry_run: bool) {
    tracing::info!(
        event = "tags_applied",
        resource_type = %resource.resource_type,
        resource_id = %resource.resource_id,
        tags = %tags,
        dry_run = dry_run,
        "tags applied"
    );
}

/// Log a failed tag write.
pub fn write_failed(resource: &ResourceDescriptor, code: &str, reason: &str) {
    tracing::warn!(
        event = "write_failed",
        resource_type = %resource.resource_type,
        resource_id = %resource.resource_id,
        code = %code,
        reason = %reason,
        "write failed"
    );
}

/// Log a retry after a throttling-class error.
pub fn retry_scheduled(operation: &str, attempt: u32, max_attempts: u32, delay_ms: u64, reason: &str) {
    tracing::debug!(
        event = "retry_scheduled",
        operation = %operation,
        attempt = attempt,
        max_attempts = max_attempts,
        delay_ms = delay_ms,
        reason = %reason,
        "retry scheduled"
    );
}

/// Log a run stopped by cancellation.
pub fn run_cancelled(mode: &str, processed: usize) {
    tracing::warn!(
        event = "run_cancelled",
        mode = %mode,
        processed = processed,
        "run cancelled, keeping gathered results"
    );
}
