use serde::{Deserialize, Serialize};

use super::defaults;
use crate::errors::EnumerationError;
use crate::models::ResourceType;

/// Run-scoped settings: where to look, what to look at, how wide to go.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub region: Option<String>,
    /// Worker pool size for per-resource calls.
    pub concurrency: usize,
    /// Resource types to process. Empty means all.
    pub resource_types: Vec<String>,
}

impl RuntimeConfig {
    /// Parsed resource types, every supported type when none are listed.
    pub fn effective_resource_types(&self) -> Result<Vec<ResourceType>, EnumerationError> {
        if self.resource_types.is_empty() {
            return Ok(ResourceType::ALL.to_vec());
        }
        let mut types = Vec::with_capacity(self.resource_types.len());
        for name in &self.resource_types {
            let t: ResourceType = name.parse()?;
            if !types.contains(&t) {
                types.push(t);
            }
        }
        Ok(types)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            region: None,
            concurrency: defaults::DEFAULT_CONCURRENCY,
            resource_types: Vec::new(),
        }
    }
}
