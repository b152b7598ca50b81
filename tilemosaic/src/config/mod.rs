//! Configuration for tilemosaic.
//!
//! [`ConfigFile`] is the user's `~/.tilemosaic/config.ini`; [`MosaicConfig`]
//! is the resolved runtime configuration handed to the library.
//!
//! # Example
//!
//! ```
//! use tilemosaic::config::{ConfigFile, MosaicConfig};
//!
//! let file = ConfigFile::default();
//! let config: MosaicConfig = file.mosaic_config().with_timeout_secs(10);
//! assert_eq!(config.timeout_secs(), 10);
//! ```

mod defaults;
mod file;
mod mosaic;
mod parser;
mod settings;

pub use defaults::{
    DEFAULT_BASE_URL, DEFAULT_CACHE_DIR, DEFAULT_LOG_FILE_NAME, DEFAULT_MIN_INTERVAL_MS,
    DEFAULT_OUTPUT_PATH,
};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use mosaic::MosaicConfig;
pub use settings::{CacheSettings, ConfigFile, DownloadSettings, LoggingSettings, OutputSettings};
