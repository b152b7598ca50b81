//! Runtime configuration for a mosaic run.

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::defaults::{DEFAULT_BASE_URL, DEFAULT_CACHE_DIR};
use crate::pipeline::{DEFAULT_MAX_PARALLEL_LOOKUPS, DEFAULT_MIN_REQUEST_INTERVAL};
use crate::provider::DEFAULT_TIMEOUT_SECS;

/// Settings for building a [`MosaicOrchestrator`](crate::orchestrator::MosaicOrchestrator).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use tilemosaic::config::MosaicConfig;
///
/// let config = MosaicConfig::default();
/// assert_eq!(config.timeout_secs(), 30);
/// assert_eq!(config.min_request_interval(), Duration::from_millis(100));
///
/// let config = MosaicConfig::new()
///     .with_cache_dir("/tmp/tiles")
///     .with_max_parallel_lookups(64);
/// assert_eq!(config.max_parallel_lookups(), 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MosaicConfig {
    cache_dir: PathBuf,
    base_url: String,
    timeout_secs: u64,
    min_request_interval: Duration,
    max_parallel_lookups: usize,
}

impl MosaicConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cache root directory. Default: `.cache`.
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    /// Set the tile server prefix.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the HTTP request timeout in seconds. Default: 30 seconds.
    pub fn with_timeout_secs(mut self, timeout: u64) -> Self {
        self.timeout_secs = timeout;
        self
    }

    /// Set the minimum spacing between request starts. Default: 100ms.
    pub fn with_min_request_interval(mut self, interval: Duration) -> Self {
        self.min_request_interval = interval;
        self
    }

    /// Set the ceiling on concurrent cache lookups. Values below 1 are
    /// raised to 1. Default: 1000.
    pub fn with_max_parallel_lookups(mut self, max: usize) -> Self {
        self.max_parallel_lookups = max.max(1);
        self
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    pub fn min_request_interval(&self) -> Duration {
        self.min_request_interval
    }

    pub fn max_parallel_lookups(&self) -> usize {
        self.max_parallel_lookups
    }
}

impl Default for MosaicConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            min_request_interval: DEFAULT_MIN_REQUEST_INTERVAL,
            max_parallel_lookups: DEFAULT_MAX_PARALLEL_LOOKUPS,
        }
    }
}
