use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Remediation settings: the tag values written to non-compliant resources.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemediationConfig {
    /// Tag values applied when a required key is missing. Values may use
    /// `{resource_type}`, `{resource_id}` and `{region}` placeholders.
    pub default_tags: BTreeMap<String, String>,
    /// Write the whole tag map instead of only the missing keys.
    pub overwrite_existing: bool,
    /// Backend tag cap per resource.
    pub max_tags_per_resource: usize,
}

impl Default for RemediationConfig {
    fn default() -> Self {
        let default_tags = [defaults::DEFAULT_OWNER_TAG, defaults::DEFAULT_COST_CENTER_TAG]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            default_tags,
            overwrite_existing: defaults::DEFAULT_OVERWRITE_EXISTING,
            max_tags_per_resource: defaults::DEFAULT_MAX_TAGS_PER_RESOURCE,
        }
    }
}
