//! Types for mosaic orchestration.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::coord::{BoundingBox, CoordError};
use crate::fetch::FetchError;
use crate::mosaic::RasterError;

/// Errors that can fail a mosaic run.
///
/// Any error means no output file was written.
#[derive(Debug, Error)]
pub enum MosaicError {
    /// Bounding box or zoom out of range
    #[error(transparent)]
    Coord(#[from] CoordError),

    /// A tile could not be fetched
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Nothing to compose
    #[error("No tiles were fetched")]
    NoTiles,

    /// A cached tile could not be read back
    #[error("Failed to read cached tile {}: {source}", path.display())]
    TileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Decode, canvas or encode failure
    #[error(transparent)]
    Raster(#[from] RasterError),

    /// The blocking compose task panicked or was cancelled
    #[error("Compose task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// A single mosaic job.
#[derive(Debug, Clone, PartialEq)]
pub struct MosaicRequest {
    pub bounds: BoundingBox,
    pub zoom: u8,
    /// Tile server prefix; tiles are requested as `{base_url}{z}/{x}/{y}.png`.
    pub base_url: String,
    pub output: PathBuf,
}

impl MosaicRequest {
    pub fn new(
        bounds: BoundingBox,
        zoom: u8,
        base_url: impl Into<String>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            bounds,
            zoom,
            base_url: base_url.into(),
            output: output.into(),
        }
    }
}

/// Result of composing fetched tiles into an output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composition {
    pub tile_width: u32,
    pub tile_height: u32,
    pub width: u32,
    pub height: u32,
    /// Pixels left at the background colour because a tile was short
    pub skipped_pixels: u64,
    pub output_bytes: u64,
}

/// Summary of a completed mosaic run.
#[derive(Debug, Clone, PartialEq)]
pub struct MosaicReport {
    pub columns: u32,
    pub rows: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    pub cache_hits: usize,
    pub downloads: usize,
    pub skipped_pixels: u64,
    pub output: PathBuf,
    pub output_bytes: u64,
    pub elapsed: Duration,
}

impl MosaicReport {
    /// Total number of tiles in the mosaic.
    pub fn tile_count(&self) -> usize {
        self.cache_hits + self.downloads
    }
}
