//! Retry with exponential backoff.
//!
//! Retries are off unless `ClientOptions::max_retries` is set. Only errors
//! that report [`RetryableError::is_retryable`] are retried, and a delay the
//! server asks for through `Retry-After` takes precedence over the backoff.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

use crate::error::ClientError;

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries (excluding the initial request).
    pub max_retries: u32,
    /// Base delay for exponential backoff.
    pub base_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Whether to add jitter.
    pub add_jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            add_jitter: true,
        }
    }
}

impl RetryConfig {
    /// Create a new retry configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of retries.
    #[must_use]
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the base delay for exponential backoff.
    #[must_use]
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Set the maximum delay between retries.
    #[must_use]
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Enable or disable jitter.
    #[must_use]
    pub fn with_jitter(mut self, enable: bool) -> Self {
        self.add_jitter = enable;
        self
    }

    /// Delay before retry number `attempt` (starting at 0).
    ///
    /// `base_delay * 2^attempt`, capped at `max_delay`, plus up to 25%
    /// jitter when enabled.
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let multiplier = 2u32.saturating_pow(attempt);
        let delay = self
            .base_delay
            .saturating_mul(multiplier)
            .min(self.max_delay);

        if !self.add_jitter {
            return delay;
        }

        let jitter_range = u64::try_from(delay.as_millis() / 4).unwrap_or(u64::MAX);
        if jitter_range == 0 {
            return delay;
        }
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .subsec_nanos();
        delay + Duration::from_millis(u64::from(nanos) % jitter_range)
    }
}

/// Errors that can say whether a retry may succeed.
pub trait RetryableError {
    /// Returns true if this error is retryable.
    fn is_retryable(&self) -> bool;

    /// Delay the server asked for, if any.
    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

impl RetryableError for ClientError {
    fn is_retryable(&self) -> bool {
        ClientError::is_retryable(self)
    }

    fn retry_after(&self) -> Option<Duration> {
        ClientError::retry_after(self)
    }
}

/// Execute an async operation with retry logic.
pub async fn with_retry<F, Fut, T, E>(config: &RetryConfig, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: RetryableError,
{
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(err) => {
                if !err.is_retryable() || attempt >= config.max_retries {
                    return Err(err);
                }

                let delay = err
                    .retry_after()
                    .map_or_else(|| config.delay_for_attempt(attempt), |d| d.min(config.max_delay));
                warn!(
                    attempt = attempt + 1,
                    max_retries = config.max_retries,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "retrying after transient error"
                );

                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct TestError {
        retryable: bool,
        retry_after: Option<Duration>,
    }

    impl RetryableError for TestError {
        fn is_retryable(&self) -> bool {
            self.retryable
        }

        fn retry_after(&self) -> Option<Duration> {
            self.retry_after
        }
    }

    #[test]
    fn test_retry_config_defaults() {
        let config = RetryConfig::default();
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.base_delay, Duration::from_millis(500));
        assert_eq!(config.max_delay, Duration::from_secs(8));
        assert!(config.add_jitter);
    }

    #[test]
    fn test_exponential_backoff() {
        let config = RetryConfig::new()
            .with_base_delay(Duration::from_millis(100))
            .with_max_delay(Duration::from_secs(60))
            .with_jitter(false);

        assert_eq!(config.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(200));
        assert_eq!(config.delay_for_attempt(2), Duration::from_millis(400));
        assert_eq!(config.delay_for_attempt(3), Duration::from_millis(800));
    }

    #[test]
    fn test_max_delay_cap() {
        let config = RetryConfig::new()
            .with_base_delay(Duration::from_secs(1))
            .with_max_delay(Duration::from_secs(5))
            .with_jitter(false);

        assert_eq!(config.delay_for_attempt(2), Duration::from_secs(4));
        assert_eq!(config.delay_for_attempt(3), Duration::from_secs(5));
        assert_eq!(config.delay_for_attempt(40), Duration::from_secs(5));
    }

    #[test]
    fn test_jitter_stays_within_a_quarter() {
        let config = RetryConfig::new()
            .with_base_delay(Duration::from_millis(400))
            .with_jitter(true);
        let delay = config.delay_for_attempt(0);
        assert!(delay >= Duration::from_millis(400));
        assert!(delay < Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_disabled_by_default() {
        let mut calls = 0;
        let result = with_retry(&RetryConfig::default(), || {
            calls += 1;
            async {
                Err::<(), _>(TestError {
                    retryable: true,
                    retry_after: None,
                })
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_non_retryable_is_returned_immediately() {
        let mut calls = 0;
        let config = RetryConfig::new().with_max_retries(3);
        let result = with_retry(&config, || {
            calls += 1;
            async {
                Err::<(), _>(TestError {
                    retryable: false,
                    retry_after: None,
                })
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_until_exhausted() {
        let mut calls = 0;
        let config = RetryConfig::new().with_max_retries(2);
        let result = with_retry(&config, || {
            calls += 1;
            async {
                Err::<(), _>(TestError {
                    retryable: true,
                    retry_after: Some(Duration::from_secs(1)),
                })
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn test_success_after_transient_failure() {
        let mut calls = 0;
        let config = RetryConfig::new()
            .with_max_retries(2)
            .with_base_delay(Duration::from_millis(1));
        let result = with_retry(&config, || {
            calls += 1;
            let attempt = calls;
            async move {
                if attempt < 2 {
                    Err(TestError {
                        retryable: true,
                        retry_after: None,
                    })
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 2);
    }
}
