//! Additive tag writes with pre-flight validation.

use tagguard_core::errors::{BackendError, ErrorCode, WriteError};
use tagguard_core::tracing::events;
use tagguard_core::validation;
use tagguard_core::{RemediationOutcome, ResourceDescriptor, TagSet};

use crate::handlers::HandlerRegistry;

/// Writes tag maps to resources through the handler for their type.
///
/// Writes are additive and idempotent: keys in the write set are set
/// (last write wins), every other key on the resource is left alone.
#[derive(Debug, Clone)]
pub struct TagWriter {
    registry: HandlerRegistry,
    max_tags_per_resource: usize,
}

impl TagWriter {
    pub fn new(registry: HandlerRegistry, max_tags_per_resource: usize) -> Self {
        Self {
            registry,
            max_tags_per_resource,
        }
    }

    /// Validate `tags` and, when the resource's current tags are known,
    /// check the tag cap before any backend call.
    pub fn preflight(
        &self,
        resource: &ResourceDescriptor,
        tags: &TagSet,
        current: Option<&TagSet>,
    ) -> Result<(), WriteError> {
        validation::validate_tags(tags).map_err(|reason| WriteError::InvalidTag {
            resource_id: resource.resource_id.clone(),
            reason,
        })?;
        if let Some(current) = current {
            let attempted = current.len() + current.new_key_count(tags);
            if attempted > self.max_tags_per_resource {
                return Err(WriteError::LimitExceeded {
                    resource_id: resource.resource_id.clone(),
                    attempted,
                    limit: self.max_tags_per_resource,
                });
            }
        }
        Ok(())
    }

    /// Write `tags` to `resource`.
    pub fn write(
        &self,
        resource: &ResourceDescriptor,
        tags: &TagSet,
        current: Option<&TagSet>,
    ) -> Result<(), WriteError> {
        self.preflight(resource, tags, current)?;
        let handler = self
            .registry
            .get(resource.resource_type)
            .map_err(|e| WriteError::Backend {
                resource_id: resource.resource_id.clone(),
                cause: BackendError::Unsupported {
                    resource_type: e.resource_type_name(),
                },
            })?;
        handler.write_tags(resource, tags)
    }

    /// Apply `tags` and report the outcome. On a dry run only the
    /// pre-flight checks run; the write API is not called.
    pub fn apply(
        &self,
        resource: &ResourceDescriptor,
        tags: TagSet,
        current: Option<&TagSet>,
        dry_run: bool,
    ) -> RemediationOutcome {
        let result = if dry_run {
            self.preflight(resource, &tags, current)
        } else {
            self.write(resource, &tags, current)
        };
        match result {
            Ok(()) => {
                events::tags_applied(resource, &tags, dry_run);
                RemediationOutcome::done(resource.clone(), tags, dry_run)
            }
            Err(e) => {
                events::write_failed(resource, e.error_code(), &e.to_string());
                RemediationOutcome::failed(resource.clone(), tags, e.into(), dry_run)
            }
        }
    }
}
