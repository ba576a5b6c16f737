use serde::{Deserialize, Serialize};

use super::TagSet;
use crate::config::PolicyConfig;

/// Required tag keys for a run, in the order they are reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompliancePolicy {
    required_keys: Vec<String>,
    /// Treat a key present with a blank value as missing.
    pub treat_empty_as_missing: bool,
}

impl CompliancePolicy {
    /// Build a policy. Blank keys are dropped and duplicates collapse
    /// to their first occurrence.
    pub fn new<I, S>(required_keys: I, treat_empty_as_missing: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut keys: Vec<String> = Vec::new();
        for key in required_keys {
            let key = key.into().trim().to_string();
            if !key.is_empty() && !keys.contains(&key) {
                keys.push(key);
            }
        }
        Self {
            required_keys: keys,
            treat_empty_as_missing,
        }
    }

    pub fn from_config(config: &PolicyConfig) -> Self {
        Self::new(config.required_tags.iter().cloned(), config.treat_empty_as_missing)
    }

    pub fn required_keys(&self) -> &[String] {
        &self.required_keys
    }

    pub fn is_required(&self, key: &str) -> bool {
        self.required_keys.iter().any(|k| k == key)
    }

    /// Whether `tags` satisfies the requirement for `key`.
    pub fn is_satisfied(&self, tags: &TagSet, key: &str) -> bool {
        if self.treat_empty_as_missing {
            tags.has_non_empty(key)
        } else {
            tags.contains_key(key)
        }
    }
}

impl Default for CompliancePolicy {
    fn default() -> Self {
        Self::from_config(&PolicyConfig::default())
    }
}
