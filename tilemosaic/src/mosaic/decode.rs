//! Tile decoding.

use std::io::Cursor;

use image::ImageReader;

use super::RasterError;

/// A tile decoded to tightly packed RGBA bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTile {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Decodes an encoded tile (PNG, JPEG or WebP) to RGBA.
pub fn decode_tile(bytes: &[u8]) -> Result<DecodedTile, RasterError> {
    let rgba = image::load_from_memory(bytes)
        .map_err(RasterError::Decode)?
        .to_rgba8();

    Ok(DecodedTile {
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.into_raw(),
    })
}

/// Reads a tile's pixel dimensions from its header without decoding it.
pub fn tile_dimensions(bytes: &[u8]) -> Result<(u32, u32), RasterError> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(RasterError::Header)?
        .into_dimensions()
        .map_err(RasterError::Decode)
}
