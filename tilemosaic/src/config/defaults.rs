//! Default configuration values.

use std::path::PathBuf;
use std::time::Duration;

use super::file::config_directory;
use super::settings::{CacheSettings, ConfigFile, DownloadSettings, LoggingSettings, OutputSettings};
use crate::pipeline::{DEFAULT_MAX_PARALLEL_LOOKUPS, DEFAULT_MIN_REQUEST_INTERVAL};
use crate::provider::DEFAULT_TIMEOUT_SECS;

/// Default tile server prefix (OpenRiverboatMap).
pub const DEFAULT_BASE_URL: &str = "https://a.tile.openstreetmap.fr/openriverboatmap/";

/// Default cache directory, relative to the working directory.
pub const DEFAULT_CACHE_DIR: &str = ".cache";

/// Default output file.
pub const DEFAULT_OUTPUT_PATH: &str = "output.png";

/// Default request spacing in milliseconds.
pub const DEFAULT_MIN_INTERVAL_MS: u64 = DEFAULT_MIN_REQUEST_INTERVAL.as_millis() as u64;

/// Default log file name inside the config directory.
pub const DEFAULT_LOG_FILE_NAME: &str = "tilemosaic.log";

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            download: DownloadSettings {
                base_url: DEFAULT_BASE_URL.to_string(),
                timeout: DEFAULT_TIMEOUT_SECS,
                min_interval: Duration::from_millis(DEFAULT_MIN_INTERVAL_MS),
            },
            cache: CacheSettings {
                directory: PathBuf::from(DEFAULT_CACHE_DIR),
                max_parallel_lookups: DEFAULT_MAX_PARALLEL_LOOKUPS,
            },
            output: OutputSettings {
                path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            },
            logging: LoggingSettings {
                file: config_directory().join(DEFAULT_LOG_FILE_NAME),
            },
        }
    }
}
