//! In-memory RGBA canvas that decoded tiles are copied into.

use image::{Rgba, RgbaImage};

use super::RasterError;

/// Opaque white, the canvas fill before any tile lands.
pub const BACKGROUND_WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

const BYTES_PER_PIXEL: usize = 4;

/// Destination rectangle of one tile on the canvas, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl TileRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// The output raster, mutated once per tile and encoded once.
#[derive(Debug)]
pub struct MosaicCanvas {
    image: RgbaImage,
}

impl MosaicCanvas {
    /// Allocates a `width` x `height` canvas filled with `background`.
    ///
    /// Fails with [`RasterError::CanvasTooLarge`] when the pixel buffer size
    /// overflows `usize`.
    pub fn new(width: u32, height: u32, background: Rgba<u8>) -> Result<Self, RasterError> {
        let too_large = || RasterError::CanvasTooLarge {
            width: width as u64,
            height: height as u64,
        };

        (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(BYTES_PER_PIXEL))
            .filter(|&len| len <= isize::MAX as usize)
            .ok_or_else(too_large)?;

        Ok(Self {
            image: RgbaImage::from_pixel(width, height, background),
        })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Copies a decoded tile into `rect`.
    ///
    /// Returns the number of pixels that were skipped because the source
    /// buffer was too short or the destination fell outside the canvas.
    pub fn composite(&mut self, tile_pixels: &[u8], rect: TileRect) -> u64 {
        let width = self.image.width();
        copy_tile(&mut self.image, width, tile_pixels, rect)
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

/// Copies `src`, a `rect.width` x `rect.height` RGBA buffer, into `dest` at
/// `(rect.x, rect.y)`.
///
/// Pixels move as little-endian `u32` words. A pixel whose source bytes run
/// past the end of `src`, or whose destination lies outside `dest`, is
/// skipped and counted; prior canvas values are left in place.
pub fn copy_tile(dest: &mut [u8], dest_width: u32, src: &[u8], rect: TileRect) -> u64 {
    let dest_width = dest_width as usize;
    let dest_stride = dest_width * BYTES_PER_PIXEL;
    let src_stride = rect.width as usize * BYTES_PER_PIXEL;
    let mut skipped = 0;

    for py in 0..rect.height as usize {
        for px in 0..rect.width as usize {
            let src_offset = py * src_stride + px * BYTES_PER_PIXEL;
            let dest_x = rect.x as usize + px;
            let dest_offset =
                (rect.y as usize + py) * dest_stride + dest_x * BYTES_PER_PIXEL;

            if src_offset + BYTES_PER_PIXEL > src.len()
                || dest_x >= dest_width
                || dest_offset + BYTES_PER_PIXEL > dest.len()
            {
                skipped += 1;
                continue;
            }

            let mut word = [0u8; BYTES_PER_PIXEL];
            word.copy_from_slice(&src[src_offset..src_offset + BYTES_PER_PIXEL]);
            let pixel = u32::from_le_bytes(word);
            dest[dest_offset..dest_offset + BYTES_PER_PIXEL].copy_from_slice(&pixel.to_le_bytes());
        }
    }

    skipped
}
