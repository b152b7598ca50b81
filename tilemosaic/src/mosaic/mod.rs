//! Raster work for the mosaic: tile decoding, canvas composition and output
//! encoding.
//!
//! Everything here is synchronous and CPU-bound. The orchestrator runs it
//! inside `spawn_blocking`.

mod canvas;
mod decode;
mod encode;

pub use canvas::{copy_tile, MosaicCanvas, TileRect, BACKGROUND_WHITE};
pub use decode::{decode_tile, tile_dimensions, DecodedTile};
pub use encode::save_mosaic;

use std::path::PathBuf;
use thiserror::Error;

/// Errors from decoding, composing or encoding rasters.
#[derive(Debug, Error)]
pub enum RasterError {
    /// Requested canvas does not fit in addressable memory
    #[error("Canvas of {width}x{height} pixels is too large")]
    CanvasTooLarge { width: u64, height: u64 },

    /// Tile bytes are not a decodable image
    #[error("Failed to decode tile: {0}")]
    Decode(#[source] image::ImageError),

    /// Tile header could not be read
    #[error("Failed to read tile header: {0}")]
    Header(#[source] std::io::Error),

    /// Output extension does not name a known image format
    #[error("Cannot infer an image format from {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    /// Encoder rejected the canvas
    #[error("Failed to encode {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Encoded bytes could not be written
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
