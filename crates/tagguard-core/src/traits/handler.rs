use crate::errors::{EnumerationError, FetchError, WriteError};
use crate::models::{ResourceDescriptor, ResourcePage, ResourceType, TagSet};

/// One entry of the per-resource-type dispatch table.
///
/// New resource types plug in here without touching the evaluator or the
/// report sink.
pub trait ResourceHandler: Send + Sync {
    fn resource_type(&self) -> ResourceType;

    /// Fetch one listing page.
    fn list_page(
        &self,
        region: &str,
        next_token: Option<&str>,
    ) -> Result<ResourcePage, EnumerationError>;

    /// Current tags of `resource`, normalized.
    fn fetch_tags(&self, resource: &ResourceDescriptor) -> Result<TagSet, FetchError>;

    /// Additively write `tags` to `resource`.
    fn write_tags(&self, resource: &ResourceDescriptor, tags: &TagSet) -> Result<(), WriteError>;
}
