//! Core types for the cache system.

use std::path::PathBuf;
use thiserror::Error;

/// Cache-related errors.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The cache root directory could not be created
    #[error("Failed to create cache directory {}: {source}", path.display())]
    CreateRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A shard directory could not be created
    #[error("Failed to create cache shard {}: {source}", path.display())]
    CreateShard {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading or probing a cache entry failed
    #[error("Failed to read cache entry {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing a cache entry failed
    #[error("Failed to write cache entry {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The blocking write task could not be joined
    #[error("Cache write task failed: {0}")]
    SpawnError(String),
}
