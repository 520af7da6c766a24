//! Signaling reconnect backoff
//!
//! The exponential-backoff-with-deterministic-jitter schedule used when the
//! signaling WebSocket drops and needs to be re-established.

use crate::NetworkError;
use std::time::Duration;

/// Backoff schedule for reconnecting to the room server.
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub jitter_factor: f64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(30),
            jitter_factor: 0.1,
        }
    }
}

impl ReconnectConfig {
    /// Build a config, clamping `jitter` to `[0, 1]` and ensuring `max >=
    /// initial`.
    pub fn new(max_retries: u32, initial: Duration, max: Duration, jitter: f64) -> Self {
        Self {
            max_retries,
            initial_backoff: initial,
            max_backoff: max.max(initial),
            jitter_factor: jitter.clamp(0.0, 1.0),
        }
    }

    /// The delay to wait before retry attempt number `attempt` (0-indexed).
    ///
    /// Exponential growth capped at `max_backoff`, plus a deterministic
    /// jitter term so the schedule is reproducible in tests rather than
    /// seeded off system randomness.
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        let base_ms = self.initial_backoff.as_millis().min(u128::from(u64::MAX)) as u64;
        let exponential_ms = base_ms.saturating_mul(1u64.checked_shl(attempt).unwrap_or(u64::MAX).max(1));
        let capped_ms = exponential_ms.min(self.max_backoff.as_millis() as u64);

        let jitter_range = (capped_ms as f64 * self.jitter_factor) as u64;
        let jitter_ms = if jitter_range > 0 {
            (u64::from(attempt) * 7 + 13) % (jitter_range + 1)
        } else {
            0
        };

        Duration::from_millis(capped_ms.saturating_add(jitter_ms))
    }

    /// Whether `attempt` (0-indexed) is still within the retry budget.
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }
}

/// Whether a signaling error is worth retrying after backoff.
///
/// Delegates to [`NetworkError::is_transient`]; kept as a free function so
/// call sites that only have a `&NetworkError` in scope (e.g. a generic
/// retry loop) don't need to import the type to call a method on it.
pub fn is_transient(err: &NetworkError) -> bool {
    err.is_transient()
}

/// Retry an async `attempt` closure under `config`'s backoff schedule,
/// stopping early on a non-transient error or once the retry budget is
/// exhausted.
pub async fn retry_with_backoff<F, Fut, T>(config: &ReconnectConfig, mut attempt: F) -> crate::Result<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = crate::Result<T>>,
{
    let mut last_err = None;
    for n in 0..=config.max_retries {
        match attempt().await {
            Ok(v) => return Ok(v),
            Err(e) if is_transient(&e) && config.should_retry(n) => {
                tokio::time::sleep(config.backoff_for_attempt(n)).await;
                last_err = Some(e);
            }
            Err(e) => return Err(e),
        }
    }
    Err(last_err.unwrap_or(NetworkError::SignalingClosed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_grows_exponentially_until_capped() {
        let config = ReconnectConfig::new(10, Duration::from_millis(100), Duration::from_secs(10), 0.0);
        assert_eq!(config.backoff_for_attempt(0), Duration::from_millis(100));
        assert_eq!(config.backoff_for_attempt(1), Duration::from_millis(200));
        assert_eq!(config.backoff_for_attempt(2), Duration::from_millis(400));
        assert_eq!(config.backoff_for_attempt(10), Duration::from_secs(10));
    }

    #[test]
    fn jitter_is_bounded_and_deterministic() {
        let config = ReconnectConfig::new(5, Duration::from_millis(1000), Duration::from_secs(30), 0.5);
        let a = config.backoff_for_attempt(3);
        let b = config.backoff_for_attempt(3);
        assert_eq!(a, b);
        assert!(a >= Duration::from_millis(1000));
        assert!(a <= Duration::from_millis(1000) + Duration::from_millis(1000));
    }

    #[test]
    fn zero_jitter_factor_never_adds_delay() {
        let config = ReconnectConfig::new(5, Duration::from_millis(500), Duration::from_secs(5), 0.0);
        assert_eq!(config.backoff_for_attempt(0), Duration::from_millis(500));
    }

    #[test]
    fn jitter_factor_clamped_above_one() {
        let config = ReconnectConfig::new(5, Duration::from_millis(100), Duration::from_secs(5), 3.0);
        assert_eq!(config.jitter_factor, 1.0);
    }

    #[test]
    fn max_backoff_never_below_initial() {
        let config = ReconnectConfig::new(5, Duration::from_secs(10), Duration::from_secs(1), 0.1);
        assert_eq!(config.max_backoff, Duration::from_secs(10));
    }

    #[test]
    fn large_attempt_number_does_not_overflow() {
        let config = ReconnectConfig::default();
        let delay = config.backoff_for_attempt(u32::MAX);
        assert!(delay <= config.max_backoff + Duration::from_millis((config.max_backoff.as_millis() as f64 * config.jitter_factor) as u64 + 1));
    }

    #[test]
    fn should_retry_respects_max_retries() {
        let config = ReconnectConfig::new(3, Duration::from_millis(1), Duration::from_millis(10), 0.0);
        assert!(config.should_retry(0));
        assert!(config.should_retry(2));
        assert!(!config.should_retry(3));
    }

    #[tokio::test(start_paused = true)]
    async fn retry_with_backoff_succeeds_after_transient_failures() {
        let config = ReconnectConfig::new(5, Duration::from_millis(10), Duration::from_millis(50), 0.0);
        let mut calls = 0;
        let result = retry_with_backoff(&config, || {
            calls += 1;
            let call = calls;
            async move {
                if call < 3 {
                    Err(NetworkError::Timeout)
                } else {
                    Ok(42)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn retry_with_backoff_stops_on_non_transient_error() {
        let config = ReconnectConfig::default();
        let mut calls = 0;
        let result: crate::Result<()> = retry_with_backoff(&config, || {
            calls += 1;
            async { Err(NetworkError::JoinRejected("full".to_string())) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }
}
