//! Grid planning: bounding box to an inclusive rectangle of tiles.

use super::{to_tile_coords, BoundingBox, CoordError, TileCoord};

/// An inclusive rectangle of tile indices at a single zoom level.
///
/// Invariant: `min_x <= max_x` and `min_y <= max_y`, so a grid always holds
/// at least one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    pub min_x: u32,
    pub max_x: u32,
    pub min_y: u32,
    pub max_y: u32,
    pub zoom: u8,
}

impl TileGrid {
    /// Builds a grid from two corner tiles in any order.
    pub fn from_corners(a: TileCoord, b: TileCoord) -> Self {
        Self {
            min_x: a.x.min(b.x),
            max_x: a.x.max(b.x),
            min_y: a.y.min(b.y),
            max_y: a.y.max(b.y),
            zoom: a.zoom,
        }
    }

    /// Plans the grid covering a geographic bounding box.
    ///
    /// Both corners are projected independently and then normalized, so the
    /// result does not depend on which corner is given first.
    ///
    /// # Example
    ///
    /// ```
    /// use tilemosaic::coord::{BoundingBox, TileGrid};
    ///
    /// let grid = TileGrid::plan(BoundingBox::new(44.0, 1.0, 44.0, 1.0), 10).unwrap();
    /// assert_eq!((grid.columns(), grid.rows()), (1, 1));
    /// ```
    pub fn plan(bounds: BoundingBox, zoom: u8) -> Result<Self, CoordError> {
        let a = to_tile_coords(bounds.lat_a, bounds.lon_a, zoom)?;
        let b = to_tile_coords(bounds.lat_b, bounds.lon_b, zoom)?;
        Ok(Self::from_corners(a, b))
    }

    /// Number of tile columns.
    pub fn columns(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    /// Number of tile rows.
    pub fn rows(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    /// Total number of tiles in the grid.
    pub fn tile_count(&self) -> usize {
        self.columns() as usize * self.rows() as usize
    }

    /// Returns true if the tile lies within this grid.
    pub fn contains(&self, tile: &TileCoord) -> bool {
        tile.zoom == self.zoom
            && (self.min_x..=self.max_x).contains(&tile.x)
            && (self.min_y..=self.max_y).contains(&tile.y)
    }

    /// Iterates every tile, column by column.
    pub fn tiles(&self) -> TileGridIter {
        TileGridIter {
            grid: *self,
            next: Some((self.min_x, self.min_y)),
        }
    }

    /// Top-left pixel of a tile inside a mosaic of uniform `tile_width` ×
    /// `tile_height` cells.
    pub fn pixel_offset(&self, tile: &TileCoord, tile_width: u32, tile_height: u32) -> (u32, u32) {
        (
            (tile.x - self.min_x) * tile_width,
            (tile.y - self.min_y) * tile_height,
        )
    }
}

/// Iterator over all tiles in a [`TileGrid`].
#[derive(Debug, Clone)]
pub struct TileGridIter {
    grid: TileGrid,
    next: Option<(u32, u32)>,
}

impl Iterator for TileGridIter {
    type Item = TileCoord;

    fn next(&mut self) -> Option<Self::Item> {
        let (x, y) = self.next?;

        self.next = if y < self.grid.max_y {
            Some((x, y + 1))
        } else if x < self.grid.max_x {
            Some((x + 1, self.grid.min_y))
        } else {
            None
        };

        Some(TileCoord::new(x, y, self.grid.zoom))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_single_point_is_one_tile() {
        let grid = TileGrid::plan(BoundingBox::new(44.0, 1.0, 44.0, 1.0), 10).unwrap();

        assert_eq!(grid.columns(), 1);
        assert_eq!(grid.rows(), 1);
        assert_eq!(grid.tile_count(), 1);
        assert_eq!(grid.tiles().count(), 1);
    }

    #[test]
    fn test_corner_order_does_not_matter() {
        let a = TileGrid::plan(BoundingBox::new(45.069040, 0.865393, 44.150070, 2.340308), 12)
            .unwrap();
        let b = TileGrid::plan(BoundingBox::new(44.150070, 2.340308, 45.069040, 0.865393), 12)
            .unwrap();
        let c = TileGrid::plan(BoundingBox::new(44.150070, 0.865393, 45.069040, 2.340308), 12)
            .unwrap();

        assert_eq!(a, b);
        assert_eq!(a, c);
        assert!(a.min_x <= a.max_x);
        assert!(a.min_y <= a.max_y);
    }

    #[test]
    fn test_tiles_cover_grid_exactly_once() {
        let grid = TileGrid {
            min_x: 10,
            max_x: 13,
            min_y: 20,
            max_y: 22,
            zoom: 6,
        };

        let tiles: Vec<_> = grid.tiles().collect();
        let unique: HashSet<_> = tiles.iter().copied().collect();

        assert_eq!(tiles.len(), 12);
        assert_eq!(unique.len(), 12);
        assert!(tiles.iter().all(|t| grid.contains(t)));
        assert_eq!(tiles[0], TileCoord::new(10, 20, 6));
        assert_eq!(tiles[1], TileCoord::new(10, 21, 6));
        assert_eq!(tiles[11], TileCoord::new(13, 22, 6));
    }

    #[test]
    fn test_pixel_offset() {
        let grid = TileGrid::from_corners(TileCoord::new(5, 7, 4), TileCoord::new(3, 9, 4));

        assert_eq!(grid.pixel_offset(&TileCoord::new(3, 7, 4), 256, 256), (0, 0));
        assert_eq!(grid.pixel_offset(&TileCoord::new(5, 8, 4), 256, 256), (512, 256));
    }

    #[test]
    fn test_contains_rejects_other_zoom() {
        let grid = TileGrid::from_corners(TileCoord::new(0, 0, 2), TileCoord::new(1, 1, 2));
        assert!(grid.contains(&TileCoord::new(1, 1, 2)));
        assert!(!grid.contains(&TileCoord::new(1, 1, 3)));
        assert!(!grid.contains(&TileCoord::new(2, 1, 2)));
    }

    #[test]
    fn test_plan_propagates_projection_errors() {
        let result = TileGrid::plan(BoundingBox::new(89.0, 0.0, 10.0, 0.0), 5);
        assert!(matches!(result, Err(CoordError::InvalidLatitude(_))));
    }
}
