//! Minimum-spacing throttle for outbound tile requests.
//!
//! Cache misses for a whole grid are discovered at roughly the same moment.
//! Public tile servers block clients that burst dozens of requests, so every
//! network fetch goes through a [`RequestThrottle`] that runs them one at a
//! time with a fixed gap between consecutive requests.

use std::future::Future;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::trace;

/// Default gap between two consecutive requests.
pub const DEFAULT_MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(100);

/// Serializes requests and spaces their start times.
///
/// Guarantees:
/// - scheduled requests start in the order `schedule` was called (the inner
///   mutex is fair);
/// - a request starts no sooner than `min_interval` after the previous one
///   finished, so consecutive start times are at least `min_interval` apart.
///
/// This is a spacing guarantee, not a rate cap: a burst is flattened to one
/// request per interval.
#[derive(Debug)]
pub struct RequestThrottle {
    min_interval: Duration,

    /// Completion time of the last request, `None` before the first one.
    last_request: Mutex<Option<Instant>>,
}

impl RequestThrottle {
    /// Creates a throttle with the given minimum spacing.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// Returns the configured minimum spacing.
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Runs `request` once every previously scheduled request has finished
    /// and the minimum interval has elapsed.
    ///
    /// The timestamp is updated whether the request succeeds or fails, so a
    /// failed request still counts against the server.
    pub async fn schedule<F, Fut, T>(&self, request: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let mut last = self.last_request.lock().await;

        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                trace!(wait_ms = wait.as_millis() as u64, "Throttling request");
                tokio::time::sleep(wait).await;
            }
        }

        let result = request().await;
        *last = Some(Instant::now());
        result
    }
}

impl Default for RequestThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_REQUEST_INTERVAL)
    }
}
