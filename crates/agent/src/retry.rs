use std::future::Future;
use std::time::Duration;

use tracing::warn;

use pattybot_core::config::LlmConfig;

use crate::llm::LlmError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_retries: 3, base_delay_ms: 500, max_delay_ms: 8_000 }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &LlmConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay_ms: config.retry_base_delay_ms,
            max_delay_ms: config.retry_max_delay_ms,
        }
    }

    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.min(16);
        let multiplier = 1_u64 << exponent;
        let delay_ms = self.base_delay_ms.saturating_mul(multiplier).min(self.max_delay_ms);
        Duration::from_millis(delay_ms)
    }
}

/// Drive `operation` until it succeeds, fails terminally, or the retry
/// budget runs out. Only errors marked retryable consume budget; anything
/// else is returned immediately.
pub async fn with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    operation_name: &str,
    mut operation: F,
) -> Result<T, LlmError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, LlmError>>,
{
    for attempt in 0..=policy.max_retries {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) if error.is_retryable() && attempt < policy.max_retries => {
                let delay = policy.backoff(attempt);
                warn!(
                    event_name = "agent.retry.attempt_failed",
                    operation = operation_name,
                    attempt,
                    max_retries = policy.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "retryable llm failure, backing off"
                );
                tokio::time::sleep(delay).await;
            }
            Err(error) => return Err(error),
        }
    }

    unreachable!("retry loop always returns within the attempt budget")
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use crate::llm::LlmError;

    use super::{with_backoff, RetryPolicy};

    fn fast_policy() -> RetryPolicy {
        RetryPolicy { max_retries: 3, base_delay_ms: 1, max_delay_ms: 4 }
    }

    #[test]
    fn backoff_doubles_and_clamps() {
        let policy = RetryPolicy { max_retries: 5, base_delay_ms: 250, max_delay_ms: 1_000 };
        assert_eq!(policy.backoff(0), Duration::from_millis(250));
        assert_eq!(policy.backoff(1), Duration::from_millis(500));
        assert_eq!(policy.backoff(2), Duration::from_millis(1_000));
        assert_eq!(policy.backoff(10), Duration::from_millis(1_000));
        // Exponent saturates instead of overflowing the shift.
        assert_eq!(policy.backoff(u32::MAX), Duration::from_millis(1_000));
    }

    #[tokio::test]
    async fn recovers_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result = with_backoff(&fast_policy(), "test", || {
            let attempt = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt < 2 {
                    Err(LlmError::RateLimited)
                } else {
                    Ok("done")
                }
            }
        })
        .await;

        assert_eq!(result.expect("eventual success"), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausts_budget_and_returns_last_error() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_backoff(&fast_policy(), "test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(LlmError::Timeout) }
        })
        .await;

        assert!(matches!(result, Err(LlmError::Timeout)));
        assert_eq!(calls.load(Ordering::SeqCst), 4, "initial attempt plus three retries");
    }

    #[tokio::test]
    async fn terminal_errors_do_not_retry() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_backoff(&fast_policy(), "test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(LlmError::Auth { status: 401 }) }
        })
        .await;

        assert!(matches!(result, Err(LlmError::Auth { status: 401 })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
