use serde::{Deserialize, Serialize};

use super::defaults;

/// Report output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub output_path: String,
    /// Bound of the channel feeding the report writer thread.
    pub channel_capacity: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_path: defaults::DEFAULT_REPORT_PATH.to_string(),
            channel_capacity: defaults::DEFAULT_CHANNEL_CAPACITY,
        }
    }
}
