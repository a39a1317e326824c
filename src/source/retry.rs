//! Bounded retry with backoff

use super::error::SourceError;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// How a client retries transient failures
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,
    /// Base delay after a generic transient failure; attempt `n` waits `n * retry_delay`
    pub retry_delay: Duration,
    /// Fixed delay after a provider quota signal
    pub quota_backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, retry_delay: Duration) -> Self {
        Self {
            max_attempts,
            retry_delay,
            quota_backoff: retry_delay,
        }
    }

    pub fn with_quota_backoff(mut self, backoff: Duration) -> Self {
        self.quota_backoff = backoff;
        self
    }

    /// Same attempt count, no waiting. For tests and offline fixtures.
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO)
    }

    /// Delay before the attempt following failure number `attempt` (1-based).
    ///
    /// A provider-supplied retry-after wins; a quota signal uses the quota
    /// backoff; anything else escalates linearly.
    pub fn delay_for(&self, error: &SourceError, attempt: u32) -> Duration {
        match error {
            SourceError::RateLimited {
                retry_after: Some(after),
            } => *after,
            SourceError::Quota(_) => self.quota_backoff,
            _ => self.retry_delay * attempt.max(1),
        }
    }
}

/// Run `op` until it succeeds, fails permanently, or runs out of attempts.
///
/// Returns `None` when the source should be treated as unavailable. Waiting
/// suspends only the calling task.
pub async fn with_retry<T, F, Fut>(source: &str, policy: &RetryPolicy, mut op: F) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SourceError>>,
{
    let max_attempts = policy.max_attempts.max(1);

    for attempt in 1..=max_attempts {
        match op().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(source, attempt, "Request succeeded after retry");
                }
                return Some(value);
            }
            Err(error) if error.is_transient() && attempt < max_attempts => {
                let delay = policy.delay_for(&error, attempt);
                warn!(source, attempt, ?delay, %error, "Transient source failure, backing off");
                tokio::time::sleep(delay).await;
            }
            Err(error) if error.is_transient() => {
                warn!(source, attempts = max_attempts, %error, "Source unavailable, retries exhausted");
                return None;
            }
            Err(error) => {
                warn!(source, %error, "Source request failed");
                return None;
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn delay_escalates_for_generic_failures() {
        let policy = RetryPolicy::new(3, Duration::from_millis(1500));
        let err = SourceError::Status(502);
        assert_eq!(policy.delay_for(&err, 1), Duration::from_millis(1500));
        assert_eq!(policy.delay_for(&err, 2), Duration::from_millis(3000));
    }

    #[test]
    fn retry_after_wins() {
        let policy = RetryPolicy::new(2, Duration::from_secs(2));
        let err = SourceError::RateLimited {
            retry_after: Some(Duration::from_secs(7)),
        };
        assert_eq!(policy.delay_for(&err, 1), Duration::from_secs(7));
    }

    #[test]
    fn quota_uses_its_own_backoff() {
        let policy = RetryPolicy::new(3, Duration::from_millis(1500))
            .with_quota_backoff(Duration::from_secs(2));
        assert_eq!(policy.delay_for(&SourceError::Quota(4), 2), Duration::from_secs(2));
    }

    #[tokio::test]
    async fn recovers_after_transient_failures() {
        let calls = &AtomicU32::new(0);
        let result = with_retry("test", &RetryPolicy::immediate(3), move || async move {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n < 3 {
                Err(SourceError::Status(500))
            } else {
                Ok(n)
            }
        })
        .await;

        assert_eq!(result, Some(3));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausting_attempts_returns_none() {
        let calls = &AtomicU32::new(0);
        let result: Option<()> = with_retry("test", &RetryPolicy::immediate(2), move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(SourceError::Network("refused".into()))
        })
        .await;

        assert_eq!(result, None);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn permanent_failure_is_not_retried() {
        let calls = &AtomicU32::new(0);
        let result: Option<()> = with_retry("test", &RetryPolicy::immediate(3), move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(SourceError::Status(404))
        })
        .await;

        assert_eq!(result, None);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn zero_attempts_still_tries_once() {
        let result = with_retry("test", &RetryPolicy::immediate(0), || async { Ok::<_, SourceError>(1) }).await;
        assert_eq!(result, Some(1));
    }
}
