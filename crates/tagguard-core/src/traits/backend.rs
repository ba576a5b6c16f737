use crate::errors::BackendError;
use crate::models::{ResourceDescriptor, ResourcePage, ResourceType, TagPayload, TagSet};

/// The capability triad every cloud backend provides.
///
/// Implementations make exactly one remote call per method invocation;
/// retries and timeouts around them are the caller's concern.
pub trait TaggingBackend: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// List one page of resources of `resource_type` in `region`.
    fn list_resources(
        &self,
        resource_type: ResourceType,
        region: &str,
        next_token: Option<&str>,
    ) -> Result<ResourcePage, BackendError>;

    /// Read the current tags of a resource, in the API's native shape.
    fn get_tags(&self, resource: &ResourceDescriptor) -> Result<TagPayload, BackendError>;

    /// Additively apply `tags`: keys in `tags` are set, all other keys are kept.
    fn tag_resource(&self, resource: &ResourceDescriptor, tags: &TagSet)
        -> Result<(), BackendError>;
}
