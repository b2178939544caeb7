//! Exponential backoff retry utility
//!
//! Used by provider transports for transient network failures. The
//! aggregation core itself never retries; its resilience mechanism is
//! partial-result tolerance.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Retry policy configuration for exponential backoff
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum retry attempts after the initial one (0 disables retries)
    pub max_retries: u32,
    /// Base delay in milliseconds for the first retry
    pub base_delay_ms: u64,
    /// Cap on the exponential delay growth, in milliseconds
    pub max_delay_ms: u64,
    /// Whether to add random jitter to delays
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 100,
            max_delay_ms: 5000,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay_ms: u64, max_delay_ms: u64, jitter: bool) -> Self {
        Self {
            max_retries,
            base_delay_ms,
            max_delay_ms,
            jitter,
        }
    }

    /// Policy for transient upstream HTTP failures: two quick jittered
    /// retries, then give up and let the caller degrade.
    pub fn transient() -> Self {
        Self {
            max_retries: 2,
            base_delay_ms: 150,
            max_delay_ms: 2000,
            jitter: true,
        }
    }

    /// Delay before retry `attempt` (0-indexed): min(base * 2^attempt, max),
    /// plus up to 30% jitter when enabled.
    fn delay_for(&self, attempt: u32) -> Duration {
        let exponential = self
            .base_delay_ms
            .saturating_mul(2_u64.saturating_pow(attempt));
        let capped = exponential.min(self.max_delay_ms);

        let with_jitter = if self.jitter {
            let range = (capped as f64 * 0.3) as u64;
            let jitter = if range > 0 {
                let nanos = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .unwrap_or_default()
                    .subsec_nanos() as u64;
                nanos % (range + 1)
            } else {
                0
            };
            capped.saturating_add(jitter)
        } else {
            capped
        };

        Duration::from_millis(with_jitter)
    }
}

/// Retry an async operation with exponential backoff
///
/// Re-executes the operation on failure while `is_retryable` holds for the
/// error and attempts remain; otherwise returns the last error.
pub async fn retry_with_backoff<F, Fut, T, E, P>(
    mut operation: F,
    policy: RetryPolicy,
    is_retryable: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
{
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(error) => {
                if attempt >= policy.max_retries {
                    tracing::warn!(
                        attempt,
                        max_retries = policy.max_retries,
                        "all retry attempts exhausted"
                    );
                    return Err(error);
                }
                if !is_retryable(&error) {
                    return Err(error);
                }

                let delay = policy.delay_for(attempt);
                tracing::debug!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "retrying after delay"
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
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn delay_grows_exponentially_up_to_the_cap() {
        let policy = RetryPolicy::new(10, 100, 500, false);
        assert_eq!(policy.delay_for(0).as_millis(), 100);
        assert_eq!(policy.delay_for(1).as_millis(), 200);
        assert_eq!(policy.delay_for(2).as_millis(), 400);
        assert_eq!(policy.delay_for(3).as_millis(), 500);
        assert_eq!(policy.delay_for(9).as_millis(), 500);
    }

    #[test]
    fn jitter_stays_within_thirty_percent() {
        let policy = RetryPolicy::new(3, 1000, 5000, true);
        let delay = policy.delay_for(0).as_millis();
        assert!((1000..=1300).contains(&delay));
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = Arc::clone(&calls);

        let result = retry_with_backoff(
            || {
                let calls = Arc::clone(&calls_clone);
                async move {
                    if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err("transient")
                    } else {
                        Ok("done")
                    }
                }
            },
            RetryPolicy::new(5, 1, 10, false),
            |_: &&str| true,
        )
        .await;

        assert_eq!(result, Ok("done"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = Arc::clone(&calls);

        let result: Result<(), _> = retry_with_backoff(
            || {
                let calls = Arc::clone(&calls_clone);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err("persistent")
                }
            },
            RetryPolicy::new(2, 1, 10, false),
            |_: &&str| true,
        )
        .await;

        assert_eq!(result, Err("persistent"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn non_retryable_errors_fail_immediately() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = Arc::clone(&calls);

        let result: Result<(), _> = retry_with_backoff(
            || {
                let calls = Arc::clone(&calls_clone);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(crate::PriceGatewayError::NotFound("Jaws".to_string()))
                }
            },
            RetryPolicy::default(),
            crate::PriceGatewayError::is_retryable,
        )
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
