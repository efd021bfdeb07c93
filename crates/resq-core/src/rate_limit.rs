//! Minimum-spacing rate limiter shared by every request of one client.
//!
//! Keeps "last request time" semantics: each acquire resets the baseline to
//! now, so there is no burst allowance after an idle period.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Enforces `1s / requests_per_second` between consecutive acquires.
///
/// Cloning shares the same timestamp, so all clones gate together.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    min_interval: Option<Duration>,
    last_request: Arc<Mutex<Option<Instant>>>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::unlimited()
    }
}

impl RateLimiter {
    /// `None`, zero, negative, or non-finite rates mean unlimited. A rate so
    /// small that its spacing overflows `Duration` saturates to `Duration::MAX`.
    pub fn new(requests_per_second: Option<f64>) -> Self {
        let min_interval = requests_per_second
            .filter(|r| r.is_finite() && *r > 0.0)
            .map(|r| Duration::try_from_secs_f64(1.0 / r).unwrap_or(Duration::MAX));
        Self {
            min_interval,
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    pub fn unlimited() -> Self {
        Self::new(None)
    }

    pub fn per_second(requests_per_second: f64) -> Self {
        Self::new(Some(requests_per_second))
    }

    /// Required spacing between requests, or `None` when unlimited.
    pub fn min_interval(&self) -> Option<Duration> {
        self.min_interval
    }

    /// Suspends until a request may be sent, then records now as the last request.
    ///
    /// The lock is held across the wait so concurrent callers queue behind each
    /// other instead of all reading the same stale timestamp.
    pub async fn acquire(&self) {
        let Some(min_interval) = self.min_interval else {
            return;
        };
        let mut last = self.last_request.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < min_interval {
                let wait = min_interval - elapsed;
                tracing::debug!(wait_ms = wait.as_millis() as u64, "rate limit: waiting");
                tokio::time::sleep(wait).await;
            }
        }
        *last = Some(Instant::now());
    }
}
