//! Retry logic with linear backoff for registry lookups.
//!
//! Retries only on transient failures ([`LookupError::is_retryable`]: 5xx
//! and transport errors). Client errors, timeouts and cancellations are
//! returned immediately without retry.
//!
//! Each attempt runs under its own timeout. Attempt `n` (1-based) that fails
//! transiently is followed by a sleep of `delay * n` before attempt `n + 1`.

use std::future::Future;
use std::time::Duration;

use crate::error::LookupError;

/// Attempt budget and pacing for one lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RetryPolicy {
    /// Retries after the first attempt.
    pub retries: u32,
    /// Base delay; attempt `n` waits `delay * n` before retrying.
    pub delay: Duration,
    /// Per-attempt timeout.
    pub timeout: Duration,
}

/// Run `f` up to `retries + 1` times.
pub(crate) async fn retry_with_backoff<F, Fut, T>(
    identifier: &str,
    policy: RetryPolicy,
    f: F,
) -> Result<T, LookupError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, LookupError>>,
{
    let mut attempt: u32 = 0;
    loop {
        attempt += 1;
        let outcome = match tokio::time::timeout(policy.timeout, f()).await {
            Ok(result) => result,
            Err(_) => Err(LookupError::Timeout {
                elapsed_ms: u64::try_from(policy.timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        };

        match outcome {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt <= policy.retries => {
                let delay = policy.delay * attempt;
                tracing::warn!(
                    identifier,
                    attempt,
                    max_retries = policy.retries,
                    code = e.code(),
                    "registry lookup failed, retrying in {delay:?}: {e}"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn policy(retries: u32) -> RetryPolicy {
        RetryPolicy {
            retries,
            delay: Duration::from_millis(100),
            timeout: Duration::from_secs(1),
        }
    }

    fn unavailable() -> LookupError {
        LookupError::ServiceUnavailable {
            status: 503,
            reason: String::new(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn retry_exhausts_all_attempts_on_transient_failure() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = calls.clone();

        let result: Result<(), _> = retry_with_backoff("20131312955", policy(2), || {
            let c = c.clone();
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err(unavailable())
            }
        })
        .await;

        assert_eq!(result, Err(unavailable()));
        assert_eq!(calls.load(Ordering::SeqCst), 3, "retries + 1 attempts");
    }

    #[tokio::test(start_paused = true)]
    async fn backoff_is_linear() {
        let start = tokio::time::Instant::now();
        let _: Result<(), _> =
            retry_with_backoff("20131312955", policy(3), || async { Err(unavailable()) }).await;
        // 100 + 200 + 300 ms
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(600), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(700), "{elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_transient_failure() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = calls.clone();

        let result = retry_with_backoff("87654321", policy(2), || {
            let c = c.clone();
            async move {
                if c.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(LookupError::Network {
                        reason: "connection reset".into(),
                    })
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(result, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn client_errors_are_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = calls.clone();

        let result: Result<(), _> = retry_with_backoff("87654321", policy(5), || {
            let c = c.clone();
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err(LookupError::NotFound {
                    kind: padron_core::DocumentKind::Dni,
                    identifier: "87654321".into(),
                })
            }
        })
        .await;

        assert_eq!(result.unwrap_err().code(), "NOT_FOUND");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_is_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = calls.clone();

        let result: Result<(), _> = retry_with_backoff("87654321", policy(2), || {
            let c = c.clone();
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            }
        })
        .await;

        assert_eq!(result, Err(LookupError::Timeout { elapsed_ms: 1_000 }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
