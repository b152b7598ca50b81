//! Concurrency limiter for filesystem cache lookups.
//!
//! A single bounding box at high zoom can expand to tens of thousands of
//! tiles. Checking the cache for all of them at once would open as many file
//! handles, so lookups acquire a permit first.
//!
//! # Usage
//!
//! ```ignore
//! use tilemosaic::pipeline::ConcurrencyLimiter;
//!
//! let limiter = ConcurrencyLimiter::new(1000, "cache_lookup");
//!
//! async fn lookup(limiter: &ConcurrencyLimiter) {
//!     let _permit = limiter.acquire().await;
//!     // filesystem access happens here...
//!     // permit is released when _permit goes out of scope
//! }
//! ```

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Semaphore, SemaphorePermit};

/// Default ceiling for concurrent cache lookups.
pub const DEFAULT_MAX_PARALLEL_LOOKUPS: usize = 1000;

/// Bounds the number of concurrent operations.
///
/// Wraps a Tokio semaphore. The semaphore is fair: once the ceiling is
/// reached, waiting callers are admitted in the order they called
/// [`acquire`](Self::acquire).
#[derive(Debug)]
pub struct ConcurrencyLimiter {
    /// Semaphore controlling concurrent operations
    semaphore: Semaphore,

    /// Maximum permits (for stats/debugging)
    max_permits: usize,

    /// Current number of in-flight operations
    in_flight: AtomicUsize,

    /// Peak concurrent operations observed
    peak_in_flight: AtomicUsize,

    /// Label for this limiter (e.g., "cache_lookup")
    label: String,
}

impl ConcurrencyLimiter {
    /// Creates a new limiter with the specified maximum concurrent operations.
    ///
    /// # Panics
    ///
    /// Panics if `max_concurrent` is 0.
    pub fn new(max_concurrent: usize, label: impl Into<String>) -> Self {
        assert!(max_concurrent > 0, "max_concurrent must be > 0");

        Self {
            semaphore: Semaphore::new(max_concurrent),
            max_permits: max_concurrent,
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
            label: label.into(),
        }
    }

    /// Acquires a permit for an operation.
    ///
    /// Waits until a permit is available if the ceiling has been reached.
    /// The permit is released when dropped.
    pub async fn acquire(&self) -> ConcurrencyPermit<'_> {
        let permit = self
            .semaphore
            .acquire()
            .await
            .expect("semaphore closed unexpectedly");

        let current = self.in_flight.fetch_add(1, Ordering::Relaxed) + 1;
        self.update_peak(current);

        ConcurrencyPermit {
            _permit: permit,
            in_flight: &self.in_flight,
        }
    }

    /// Runs `operation` while holding a permit.
    ///
    /// The permit is released when the operation finishes, whatever its
    /// outcome, which admits the next waiting caller.
    pub async fn run<F, T>(&self, operation: F) -> T
    where
        F: Future<Output = T>,
    {
        let _permit = self.acquire().await;
        operation.await
    }

    /// Updates the peak counter if current exceeds it.
    fn update_peak(&self, current: usize) {
        self.peak_in_flight.fetch_max(current, Ordering::Relaxed);
    }

    /// Returns the label for this limiter.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the maximum number of concurrent operations allowed.
    pub fn max_concurrent(&self) -> usize {
        self.max_permits
    }

    /// Returns the current number of in-flight operations.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Returns the peak number of concurrent operations observed.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::Relaxed)
    }

    /// Returns the number of available permits.
    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }
}

/// A permit for performing a concurrent operation.
///
/// While this permit is held, it counts against the limiter's ceiling.
pub struct ConcurrencyPermit<'a> {
    _permit: SemaphorePermit<'a>,
    in_flight: &'a AtomicUsize,
}

impl Drop for ConcurrencyPermit<'_> {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Mutex;

    #[test]
    fn test_new_limiter() {
        let limiter = ConcurrencyLimiter::new(128, "test");
        assert_eq!(limiter.max_concurrent(), 128);
        assert_eq!(limiter.in_flight(), 0);
        assert_eq!(limiter.available_permits(), 128);
        assert_eq!(limiter.label(), "test");
    }

    #[test]
    #[should_panic(expected = "max_concurrent must be > 0")]
    fn test_zero_concurrency_panics() {
        ConcurrencyLimiter::new(0, "test");
    }

    #[tokio::test]
    async fn test_acquire_releases_on_drop() {
        let limiter = ConcurrencyLimiter::new(2, "test");

        {
            let _permit1 = limiter.acquire().await;
            assert_eq!(limiter.available_permits(), 1);
            assert_eq!(limiter.in_flight(), 1);

            {
                let _permit2 = limiter.acquire().await;
                assert_eq!(limiter.available_permits(), 0);
                assert_eq!(limiter.in_flight(), 2);
            }

            assert_eq!(limiter.available_permits(), 1);
            assert_eq!(limiter.in_flight(), 1);
        }

        assert_eq!(limiter.available_permits(), 2);
        assert_eq!(limiter.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_run_releases_permit_after_error() {
        let limiter = ConcurrencyLimiter::new(1, "test");

        let result: Result<(), &str> = limiter.run(async { Err("lookup failed") }).await;

        assert!(result.is_err());
        assert_eq!(limiter.in_flight(), 0);
        assert_eq!(limiter.available_permits(), 1);
    }

    #[tokio::test]
    async fn test_ceiling_never_exceeded() {
        let limiter = Arc::new(ConcurrencyLimiter::new(5, "test"));
        let completed = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let mut handles = Vec::new();

        for _ in 0..50 {
            let limiter = Arc::clone(&limiter);
            let completed = Arc::clone(&completed);
            handles.push(tokio::spawn(async move {
                limiter
                    .run(async {
                        assert!(limiter.in_flight() <= 5);
                        tokio::time::sleep(Duration::from_millis(2)).await;
                    })
                    .await;
                completed.fetch_add(1, Ordering::SeqCst);
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(completed.load(Ordering::SeqCst), 50);
        assert!(limiter.peak_in_flight() <= 5);
        assert_eq!(limiter.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_waiters_admitted_in_arrival_order() {
        let limiter = Arc::new(ConcurrencyLimiter::new(1, "test"));
        let order = Arc::new(Mutex::new(Vec::new()));

        let blocker = limiter.acquire().await;

        let mut handles = Vec::new();
        for i in 0..5 {
            let limiter = Arc::clone(&limiter);
            let order = Arc::clone(&order);
            handles.push(tokio::spawn(async move {
                let _permit = limiter.acquire().await;
                order.lock().await.push(i);
            }));
            // Let the task reach the semaphore queue before spawning the next
            tokio::task::yield_now().await;
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        drop(blocker);
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(*order.lock().await, vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_peak_tracking() {
        let limiter = ConcurrencyLimiter::new(10, "test");

        let _p1 = limiter.acquire().await;
        let p2 = limiter.acquire().await;
        let p3 = limiter.acquire().await;
        assert_eq!(limiter.peak_in_flight(), 3);

        drop(p3);
        drop(p2);

        assert_eq!(limiter.peak_in_flight(), 3);
        assert_eq!(limiter.in_flight(), 1);
    }
}
