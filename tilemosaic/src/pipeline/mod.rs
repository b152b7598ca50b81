//! Shared flow-control primitives for the fetch pipeline.
//!
//! - [`ConcurrencyLimiter`] bounds concurrent cache lookups (the gate).
//! - [`RequestThrottle`] serializes and spaces network requests.
//!
//! Neither is a global. A run creates one of each and shares them with the
//! [`TileFetcher`](crate::fetch::TileFetcher) through `Arc`, so tests can
//! build as many independent instances as they need.

mod concurrency_limiter;
mod throttle;

pub use concurrency_limiter::{ConcurrencyLimiter, ConcurrencyPermit, DEFAULT_MAX_PARALLEL_LOOKUPS};
pub use throttle::{RequestThrottle, DEFAULT_MIN_REQUEST_INTERVAL};
