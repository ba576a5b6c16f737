//! Tag reads through the dispatch table.

use tagguard_core::errors::{BackendError, FetchError};
use tagguard_core::{ResourceDescriptor, TagSet};

use crate::handlers::HandlerRegistry;

/// Reads the current tags of a resource with the handler for its type.
#[derive(Debug, Clone)]
pub struct TagFetcher {
    registry: HandlerRegistry,
}

impl TagFetcher {
    pub fn new(registry: HandlerRegistry) -> Self {
        Self { registry }
    }

    pub fn fetch(&self, resource: &ResourceDescriptor) -> Result<TagSet, FetchError> {
        let handler = self
            .registry
            .get(resource.resource_type)
            .map_err(|_| FetchError::Backend {
                resource_id: resource.resource_id.clone(),
                cause: BackendError::Unsupported {
                    resource_type: resource.resource_type.to_string(),
                },
            })?;
        handler.fetch_tags(resource)
    }
}
