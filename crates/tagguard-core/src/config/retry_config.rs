use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Backoff policy for throttling-class backend errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts per call, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles on each further retry.
    pub base_delay_ms: u64,
    /// Upper bound for a single delay.
    pub max_delay_ms: u64,
    /// Add random jitter to each delay.
    pub jitter: bool,
}

impl RetryConfig {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: defaults::DEFAULT_MAX_ATTEMPTS,
            base_delay_ms: defaults::DEFAULT_BASE_DELAY_MS,
            max_delay_ms: defaults::DEFAULT_MAX_DELAY_MS,
            jitter: defaults::DEFAULT_JITTER,
        }
    }
}
