//! Per-call retry with exponential backoff and jitter.

use std::time::Duration;

use rand::Rng;
use tagguard_core::config::RetryConfig;
use tagguard_core::errors::BackendError;
use tagguard_core::tracing::events;
use tagguard_core::CancellationToken;

/// Retries throttling-class backend errors with exponential backoff.
///
/// Attempt `n` (1-based) that fails with a retryable error sleeps
/// `min(base * 2^(n-1), max)` plus up to half that again in jitter, then
/// tries again, until `max_attempts` calls have been made. Non-retryable
/// errors are returned immediately.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
    jitter: bool,
    cancel: CancellationToken,
}

impl RetryPolicy {
    pub fn new(
        max_attempts: u32,
        base_delay: Duration,
        max_delay: Duration,
        jitter: bool,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay: max_delay.max(base_delay),
            jitter,
            cancel,
        }
    }

    pub fn from_config(config: &RetryConfig, cancel: CancellationToken) -> Self {
        Self::new(
            config.max_attempts,
            config.base_delay(),
            config.max_delay(),
            config.jitter,
            cancel,
        )
    }

    /// No retries at all.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO, Duration::ZERO, false, CancellationToken::new())
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Backoff before the retry that follows failed attempt `attempt` (1-based),
    /// without jitter.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(31);
        self.base_delay
            .checked_mul(1u32 << exp)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    fn with_jitter(&self, delay: Duration) -> Duration {
        if !self.jitter || delay.is_zero() {
            return delay;
        }
        let extra_ms = rand::thread_rng().gen_range(0..=(delay.as_millis() as u64 / 2));
        delay + Duration::from_millis(extra_ms)
    }

    /// Run `call` until it succeeds, fails with a non-retryable error, runs
    /// out of attempts, or the run is cancelled (no further attempt is made).
    pub fn run<T>(
        &self,
        operation: &str,
        mut call: impl FnMut() -> Result<T, BackendError>,
    ) -> Result<T, BackendError> {
        let mut attempt = 1;
        loop {
            match call() {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < self.max_attempts => {
                    if self.cancel.is_cancelled() {
                        return Err(err);
                    }
                    let delay = self.with_jitter(self.backoff_for(attempt));
                    events::retry_scheduled(
                        operation,
                        attempt,
                        self.max_attempts,
                        delay.as_millis() as u64,
                        &err.to_string(),
                    );
                    std::thread::sleep(delay);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(
            max_attempts,
            Duration::from_millis(1),
            Duration::from_millis(4),
            false,
            CancellationToken::new(),
        )
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let p = RetryPolicy::new(
            5,
            Duration::from_secs(1),
            Duration::from_secs(3),
            false,
            CancellationToken::new(),
        );
        assert_eq!(p.backoff_for(1), Duration::from_secs(1));
        assert_eq!(p.backoff_for(2), Duration::from_secs(2));
        assert_eq!(p.backoff_for(3), Duration::from_secs(3));
        assert_eq!(p.backoff_for(40), Duration::from_secs(3));
    }

    #[test]
    fn retries_throttling_then_succeeds() {
        let mut calls = 0;
        let result = policy(3).run("list", || {
            calls += 1;
            if calls < 3 {
                Err(BackendError::Throttled {
                    reason: "slow down".into(),
                })
            } else {
                Ok(calls)
            }
        });
        assert_eq!(result, Ok(3));
    }

    #[test]
    fn gives_up_after_max_attempts() {
        let mut calls = 0;
        let result: Result<(), _> = policy(3).run("get", || {
            calls += 1;
            Err(BackendError::Transient {
                reason: "503".into(),
            })
        });
        assert!(result.is_err());
        assert_eq!(calls, 3);
    }

    #[test]
    fn does_not_retry_access_denied() {
        let mut calls = 0;
        let result: Result<(), _> = policy(3).run("put", || {
            calls += 1;
            Err(BackendError::AccessDenied {
                reason: "no".into(),
            })
        });
        assert!(matches!(result, Err(BackendError::AccessDenied { .. })));
        assert_eq!(calls, 1);
    }

    #[test]
    fn cancellation_stops_retrying() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let p = RetryPolicy::new(5, Duration::from_millis(1), Duration::from_millis(1), false, cancel);
        let mut calls = 0;
        let result: Result<(), _> = p.run("list", || {
            calls += 1;
            Err(BackendError::Throttled {
                reason: "busy".into(),
            })
        });
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }
}
