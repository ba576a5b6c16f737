use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Which backend implementation serves the capability triad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// JSON tagging gateway over HTTP.
    #[default]
    Http,
    /// Resources and tags held in an inventory snapshot file.
    Inventory,
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub kind: BackendKind,
    /// Gateway base URL (http backend).
    pub endpoint: Option<String>,
    /// Bearer token (http backend). Usually supplied via `TAGGUARD_API_TOKEN`.
    pub api_token: Option<String>,
    /// Inventory snapshot path (inventory backend).
    pub inventory_path: Option<String>,
    /// Per-call timeout in seconds.
    pub call_timeout_secs: u64,
    /// Listing page size requested from the backend.
    pub page_size: usize,
}

impl BackendConfig {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::default(),
            endpoint: None,
            api_token: None,
            inventory_path: None,
            call_timeout_secs: defaults::DEFAULT_CALL_TIMEOUT_SECS,
            page_size: defaults::DEFAULT_PAGE_SIZE,
        }
    }
}
