//! Configuration settings structs.
//!
//! Plain data; parsing lives in [`super::parser`], defaults in
//! [`super::defaults`].

use std::path::PathBuf;
use std::time::Duration;

use super::mosaic::MosaicConfig;

/// Contents of `~/.tilemosaic/config.ini`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub download: DownloadSettings,
    pub cache: CacheSettings,
    pub output: OutputSettings,
    pub logging: LoggingSettings,
}

/// `[download]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSettings {
    /// Tile server prefix
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout: u64,
    /// Minimum spacing between request starts
    pub min_interval: Duration,
}

/// `[cache]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    pub directory: PathBuf,
    /// Ceiling on concurrent cache lookups
    pub max_parallel_lookups: usize,
}

/// `[output]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSettings {
    pub path: PathBuf,
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    pub file: PathBuf,
}

impl ConfigFile {
    /// Runtime settings for the mosaic library.
    pub fn mosaic_config(&self) -> MosaicConfig {
        MosaicConfig::new()
            .with_base_url(self.download.base_url.clone())
            .with_timeout_secs(self.download.timeout)
            .with_min_request_interval(self.download.min_interval)
            .with_cache_dir(self.cache.directory.clone())
            .with_max_parallel_lookups(self.cache.max_parallel_lookups)
    }
}
