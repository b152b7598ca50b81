//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;
use tilemosaic::config::ConfigFileError;
use tilemosaic::fetch::FetchError;
use tilemosaic::mosaic::RasterError;
use tilemosaic::orchestrator::MosaicError;
use tilemosaic::provider::ProviderError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(ConfigFileError),
    /// Failed to build the HTTP client
    Client(ProviderError),
    /// Failed to start the async runtime
    Runtime(std::io::Error),
    /// The mosaic run failed
    Mosaic(MosaicError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Mosaic(MosaicError::Fetch(FetchError::Download {
                source: ProviderError::Status { status: 403 | 429, .. },
                ..
            })) => {
                eprintln!();
                eprintln!("The tile server refused the request. Public servers limit");
                eprintln!("bulk downloads; try a smaller area, a lower zoom level, or");
                eprintln!("a larger [download] min_interval_ms in the config file.");
            }
            CliError::Mosaic(MosaicError::Raster(RasterError::UnsupportedFormat { .. })) => {
                eprintln!();
                eprintln!("Use an output file ending in .png, .jpg or .webp.");
            }
            CliError::Mosaic(MosaicError::Raster(RasterError::CanvasTooLarge { .. })) => {
                eprintln!();
                eprintln!("Reduce the bounding box or the zoom level.");
            }
            CliError::Config(_) => {
                eprintln!();
                eprintln!("Check {}", tilemosaic::config::config_file_path().display());
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Client(e) => write!(f, "Failed to create HTTP client: {}", e),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
            CliError::Mosaic(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Client(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            CliError::Mosaic(e) => Some(e),
            CliError::LoggingInit(_) => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<MosaicError> for CliError {
    fn from(e: MosaicError) -> Self {
        CliError::Mosaic(e)
    }
}
