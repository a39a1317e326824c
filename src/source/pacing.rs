//! Proactive request pacing

use governor::clock::DefaultClock;
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};
use std::fmt;
use std::time::Duration;
use tracing::trace;

type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Enforces a minimum interval between consecutive requests, whether or
/// not the provider has started throttling.
///
/// A zero interval disables pacing entirely.
pub struct Pacer {
    limiter: Option<DirectLimiter>,
    min_interval: Duration,
}

impl Pacer {
    pub fn new(min_interval: Duration) -> Self {
        // One request per period with no burst allowance
        let limiter = Quota::with_period(min_interval).map(RateLimiter::direct);
        Self {
            limiter,
            min_interval,
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait until this request may start. Only the calling task is suspended.
    pub async fn wait(&self) {
        if let Some(limiter) = &self.limiter {
            trace!(interval = ?self.min_interval, "Pacing request");
            limiter.until_ready().await;
        }
    }
}

impl fmt::Debug for Pacer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pacer")
            .field("min_interval", &self.min_interval)
            .finish()
    }
}
