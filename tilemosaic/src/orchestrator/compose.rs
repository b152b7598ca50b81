//! Synchronous composition of fetched tiles into the output file.

use std::path::Path;

use tracing::{debug, warn};

use super::progress::ProgressReporter;
use super::types::{Composition, MosaicError};
use crate::coord::TileGrid;
use crate::fetch::FetchedTile;
use crate::mosaic::{
    decode_tile, save_mosaic, tile_dimensions, MosaicCanvas, RasterError, TileRect,
    BACKGROUND_WHITE,
};

fn read_tile(path: &Path) -> Result<Vec<u8>, MosaicError> {
    std::fs::read(path).map_err(|source| MosaicError::TileRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Decodes every tile, places it on a white canvas and encodes the result
/// to `output`.
///
/// The first tile's header fixes the cell size for the whole mosaic. Tiles
/// that decode to fewer pixels than that leave the missing area white and
/// are logged. Tiles outside `grid` are logged and left out.
///
/// Blocking; run it on a blocking thread.
pub fn compose_tiles(
    tiles: &[FetchedTile],
    grid: &TileGrid,
    output: &Path,
    progress: &dyn ProgressReporter,
) -> Result<Composition, MosaicError> {
    let first = tiles.first().ok_or(MosaicError::NoTiles)?;
    let (tile_width, tile_height) = tile_dimensions(&read_tile(&first.path)?)?;

    let too_large = || RasterError::CanvasTooLarge {
        width: grid.columns() as u64 * tile_width as u64,
        height: grid.rows() as u64 * tile_height as u64,
    };
    let width = grid.columns().checked_mul(tile_width).ok_or_else(too_large)?;
    let height = grid.rows().checked_mul(tile_height).ok_or_else(too_large)?;

    debug!(width, height, tile_width, tile_height, "Allocating canvas");
    let mut canvas = MosaicCanvas::new(width, height, BACKGROUND_WHITE)?;

    progress.on_compose_start(tiles.len());
    let mut skipped_pixels = 0;
    for tile in tiles {
        if !grid.contains(&tile.coord) {
            warn!(tile = %tile.coord, "Tile outside the grid, not composited");
            progress.on_tile_composed();
            continue;
        }

        let decoded = decode_tile(&read_tile(&tile.path)?)?;
        if (decoded.width, decoded.height) != (tile_width, tile_height) {
            warn!(
                tile = %tile.coord,
                width = decoded.width,
                height = decoded.height,
                expected_width = tile_width,
                expected_height = tile_height,
                "Tile size differs from the first tile"
            );
        }

        let (x, y) = grid.pixel_offset(&tile.coord, tile_width, tile_height);
        let skipped = canvas.composite(
            &decoded.pixels,
            TileRect::new(x, y, tile_width, tile_height),
        );
        if skipped > 0 {
            warn!(tile = %tile.coord, skipped, "Tile truncated, pixels left blank");
            skipped_pixels += skipped;
        }

        progress.on_tile_composed();
    }

    let output_bytes = save_mosaic(canvas.into_image(), output)?;

    Ok(Composition {
        tile_width,
        tile_height,
        width,
        height,
        skipped_pixels,
        output_bytes,
    })
}
