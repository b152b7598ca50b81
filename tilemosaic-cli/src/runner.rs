//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization and runtime creation.

use crate::error::CliError;
use std::path::{Path, PathBuf};
use tilemosaic::config::{ConfigFile, DEFAULT_LOG_FILE_NAME};
use tilemosaic::logging::{init_logging, LoggingGuard};
use tokio::runtime::Runtime;
use tracing::info;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Create a new CLI runner, loading config and initializing logging.
    ///
    /// # Arguments
    ///
    /// * `config_path` - Config file to load instead of `~/.tilemosaic/config.ini`
    /// * `verbose` - Mirror log events to stderr at debug level; progress
    ///   bars are shown otherwise
    pub fn new(config_path: Option<&Path>, verbose: bool) -> Result<Self, CliError> {
        let config = match config_path {
            Some(path) => ConfigFile::load_from(path)?,
            None => ConfigFile::load()?,
        };

        let (log_dir, log_file) = split_log_path(&config.logging.file);
        let logging_guard = init_logging(&log_dir, &log_file, verbose, verbose)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information.
    pub fn log_startup(&self) {
        info!("tilemosaic v{}", tilemosaic::VERSION);
        info!(log_file = %self.config.logging.file.display(), "Logging initialized");
    }

    /// Build the multi-threaded runtime that drives the mosaic run.
    pub fn runtime(&self) -> Result<Runtime, CliError> {
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("tilemosaic-worker")
            .build()
            .map_err(CliError::Runtime)
    }
}

/// Splits a log file path into directory and file name, falling back to the
/// working directory and the default name.
fn split_log_path(path: &Path) -> (PathBuf, String) {
    let log_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let log_file = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| DEFAULT_LOG_FILE_NAME.to_string());
    (log_dir, log_file)
}
