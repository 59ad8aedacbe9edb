//! Retry with exponential backoff
//!
//! Only failures carrying a transient transport status are retried; anything
//! else propagates on first occurrence. After the budget is spent, the most
//! recent failure is what propagates.

use std::time::Duration;

use crate::domain::DomainError;

/// Status codes treated as transient by default: request timeout,
/// rate-limited, server error, bad gateway, service unavailable, gateway
/// timeout.
pub const RETRYABLE_STATUSES: [u16; 6] = [408, 429, 500, 502, 503, 504];

/// Retry policy for a remote operation
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt; 0 means exactly one attempt
    pub max_retries: u32,
    /// Base delay; attempt N waits `retry_delay * 2^N`
    pub retry_delay: Duration,
    /// Status allow-list the classifier checks failures against
    pub retryable_statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
            retryable_statuses: RETRYABLE_STATUSES.to_vec(),
        }
    }
}

impl RetryConfig {
    pub fn new(max_retries: u32, retry_delay: Duration) -> Self {
        Self {
            max_retries,
            retry_delay,
            ..Self::default()
        }
    }

    pub fn with_retryable_statuses(mut self, statuses: Vec<u16>) -> Self {
        self.retryable_statuses = statuses;
        self
    }

    /// Classifies a failure: retryable only if it carries a status from the
    /// allow-list.
    pub fn is_retryable(&self, error: &DomainError) -> bool {
        error
            .status()
            .is_some_and(|status| self.retryable_statuses.contains(&status))
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.retry_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Runs a fallible async operation under the retry policy.
///
/// Attempt indices run `0..=max_retries`. A failure on the last allowed
/// attempt, or one the classifier rejects, propagates immediately; otherwise
/// the calling task sleeps for the backoff delay and tries again.
pub async fn run_with_retry<T, F, Fut>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
) -> Result<T, DomainError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, DomainError>>,
{
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 0 {
                    tracing::debug!(
                        operation = operation_name,
                        attempts = attempt + 1,
                        "Operation succeeded after retry"
                    );
                }
                return Ok(result);
            }
            Err(error) => {
                if attempt >= config.max_retries {
                    tracing::warn!(
                        operation = operation_name,
                        attempts = attempt + 1,
                        error = %error,
                        "Operation failed after exhausting retries"
                    );
                    return Err(error);
                }

                if !config.is_retryable(&error) {
                    tracing::debug!(
                        operation = operation_name,
                        error = %error,
                        "Failure is not retryable, propagating immediately"
                    );
                    return Err(error);
                }

                let delay = config.backoff(attempt);
                tracing::warn!(
                    operation = operation_name,
                    attempt = attempt + 1,
                    retry_in_ms = delay.as_millis() as u64,
                    error = %error,
                    "Transient failure, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn transient() -> DomainError {
        DomainError::api(503, "service unavailable")
    }

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let config = RetryConfig::default();
        let calls = AtomicUsize::new(0);

        let result = run_with_retry(&config, "op", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, DomainError>(42) }
        })
        .await
        .unwrap();

        assert_eq!(result, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_transient_failures() {
        let config = RetryConfig::new(3, Duration::from_millis(100));
        let calls = AtomicUsize::new(0);

        let result = run_with_retry(&config, "op", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(transient())
                } else {
                    Ok("recovered")
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(result, "recovered");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausts_budget_with_exponential_waits() {
        let config = RetryConfig::new(3, Duration::from_millis(100));
        let calls = AtomicUsize::new(0);
        let started = tokio::time::Instant::now();

        let result: Result<(), _> = run_with_retry(&config, "op", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(transient()) }
        })
        .await;

        // max_retries = 3 means exactly 4 attempts
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert!(matches!(result, Err(DomainError::Api { status: 503, .. })));

        // Waits of 100, 200 and 400 ms between attempts
        assert_eq!(started.elapsed(), Duration::from_millis(700));
    }

    #[tokio::test]
    async fn test_non_retryable_failure_propagates_immediately() {
        let config = RetryConfig::new(5, Duration::from_millis(100));
        let calls = AtomicUsize::new(0);

        let result: Result<(), _> = run_with_retry(&config, "op", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(DomainError::validation("bad request")) }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_status_outside_allow_list_is_not_retried() {
        let config = RetryConfig::new(5, Duration::from_millis(100));
        let calls = AtomicUsize::new(0);

        let result: Result<(), _> = run_with_retry(&config, "op", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(DomainError::api(418, "teapot")) }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_zero_retries_means_single_attempt() {
        let config = RetryConfig::new(0, Duration::from_millis(100));
        let calls = AtomicUsize::new(0);
        let started = std::time::Instant::now();

        let result: Result<(), _> = run_with_retry(&config, "op", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(transient()) }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(result.is_err());
        // No waiting happened
        assert!(started.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_failure_propagates() {
        let config = RetryConfig::new(1, Duration::from_millis(10));
        let calls = AtomicUsize::new(0);

        let result: Result<(), _> = run_with_retry(&config, "op", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(DomainError::api(503, "first"))
                } else {
                    Err(DomainError::api(502, "second"))
                }
            }
        })
        .await;

        match result {
            Err(DomainError::Api { status, message }) => {
                assert_eq!(status, 502);
                assert_eq!(message, "second");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
