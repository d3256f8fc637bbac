//! Bounded retry with exponential backoff.
//!
//! Service calls that may fail transiently (embedding, generation) are
//! wrapped in a capped retry loop rather than retried forever, so a stuck
//! upstream cannot starve a worker pool or a request-serving task.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::error::{HarkError, Result};

/// Retry policy with a fixed attempt cap and doubling delay.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    max_attempts: u32,
    /// Delay before the second attempt; doubles per attempt after that.
    base_delay: Duration,
    /// Upper bound on a single delay.
    max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 6,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Create a policy with a custom attempt cap and base delay.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay: Duration::from_secs(60),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Run `operation`, retrying failures for which `retryable` returns true.
    ///
    /// Non-retryable errors are returned from the attempt that produced
    /// them; retryable errors are returned once the attempt cap is reached.
    pub async fn run<T, F, Fut, P>(&self, retryable: P, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
        P: Fn(&HarkError) -> bool,
    {
        let mut delay = self.base_delay;
        let mut attempt = 1u32;

        loop {
            match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!("Operation succeeded on attempt {}", attempt);
                    }
                    return Ok(value);
                }
                Err(e) if attempt < self.max_attempts && retryable(&e) => {
                    warn!(
                        "Attempt {}/{} failed ({}), retrying in {:?}",
                        attempt, self.max_attempts, e, delay
                    );
                    sleep(delay).await;
                    delay = (delay * 2).min(self.max_delay);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn rate_limit_error() -> HarkError {
        HarkError::Generation {
            message: "rate limited".to_string(),
            rate_limited: true,
        }
    }

    #[tokio::test]
    async fn test_gives_up_after_attempt_cap() {
        let policy = RetryPolicy::new(6, Duration::ZERO);
        let attempts = AtomicU32::new(0);

        let result: Result<()> = policy
            .run(HarkError::is_rate_limited, || async {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err(rate_limit_error())
            })
            .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 6);
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let policy = RetryPolicy::new(6, Duration::ZERO);
        let attempts = AtomicU32::new(0);

        let result = policy
            .run(HarkError::is_rate_limited, || async {
                if attempts.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(rate_limit_error())
                } else {
                    Ok(42)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_fails_on_first_attempt() {
        let policy = RetryPolicy::new(6, Duration::ZERO);
        let attempts = AtomicU32::new(0);

        let result: Result<()> = policy
            .run(HarkError::is_rate_limited, || async {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err(HarkError::Generation {
                    message: "model does not exist".to_string(),
                    rate_limited: false,
                })
            })
            .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
