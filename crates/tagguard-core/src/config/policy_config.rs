use serde::{Deserialize, Serialize};

use super::defaults;

/// Required-tag policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Tag keys every resource must carry, in report order.
    pub required_tags: Vec<String>,
    /// Count a tag present with a blank value as missing.
    pub treat_empty_as_missing: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            required_tags: defaults::DEFAULT_REQUIRED_TAGS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            treat_empty_as_missing: defaults::DEFAULT_TREAT_EMPTY_AS_MISSING,
        }
    }
}
