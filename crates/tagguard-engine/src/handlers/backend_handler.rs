use std::sync::Arc;

use tagguard_core::errors::{EnumerationError, FetchError, WriteError};
use tagguard_core::models::TagShape;
use tagguard_core::{
    ResourceDescriptor, ResourceHandler, ResourcePage, ResourceType, TagSet, TaggingBackend,
};

use crate::retry::RetryPolicy;

/// Handler that serves one resource type from a [`TaggingBackend`],
/// normalizing the type's native tag shape and retrying throttled calls.
pub struct BackendHandler {
    resource_type: ResourceType,
    expected_shape: TagShape,
    backend: Arc<dyn TaggingBackend>,
    retry: RetryPolicy,
}

impl BackendHandler {
    pub fn new(resource_type: ResourceType, backend: Arc<dyn TaggingBackend>, retry: RetryPolicy) -> Self {
        Self {
            resource_type,
            expected_shape: resource_type.tag_shape(),
            backend,
            retry,
        }
    }
}

impl ResourceHandler for BackendHandler {
    fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    fn list_page(
        &self,
        region: &str,
        next_token: Option<&str>,
    ) -> Result<ResourcePage, EnumerationError> {
        self.retry
            .run("list_resources", || {
                self.backend
                    .list_resources(self.resource_type, region, next_token)
            })
            .map_err(|e| EnumerationError::from_backend(self.resource_type, e))
    }

    fn fetch_tags(&self, resource: &ResourceDescriptor) -> Result<TagSet, FetchError> {
        let payload = self
            .retry
            .run("get_tags", || self.backend.get_tags(resource))
            .map_err(|e| FetchError::from_backend(&resource.resource_id, e))?;
        if payload.shape() != self.expected_shape {
            return Err(FetchError::UnexpectedShape {
                resource_id: resource.resource_id.clone(),
                expected: self.expected_shape.as_str(),
                actual: payload.shape().as_str(),
            });
        }
        Ok(payload.into_tag_set(&resource.resource_arn))
    }

    fn write_tags(&self, resource: &ResourceDescriptor, tags: &TagSet) -> Result<(), WriteError> {
        self.retry
            .run("tag_resource", || self.backend.tag_resource(resource, tags))
            .map_err(|e| WriteError::from_backend(&resource.resource_id, e))
    }
}
