//! Output encoding.

use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, ImageFormat, RgbaImage};
use tracing::{debug, warn};

use super::RasterError;

const JPEG_QUALITY: u8 = 90;

/// Encodes `image` in the format implied by the extension of `path` and
/// writes it there.
///
/// JPEG output is flattened to RGB at quality 90; every other format keeps
/// the alpha channel. The whole file is encoded in memory first and then
/// written through a temporary file in the same directory, so a failure at
/// any stage leaves no partial image at `path`.
pub fn save_mosaic(image: RgbaImage, path: &Path) -> Result<u64, RasterError> {
    let format = ImageFormat::from_path(path).map_err(|_| RasterError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let encode_error = |source| RasterError::Encode {
        path: path.to_path_buf(),
        source,
    };

    let mut buffer = Vec::new();
    if format == ImageFormat::Jpeg {
        let rgb = DynamicImage::ImageRgba8(image).into_rgb8();
        JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY)
            .encode(
                rgb.as_raw(),
                rgb.width(),
                rgb.height(),
                ExtendedColorType::Rgb8,
            )
            .map_err(encode_error)?;
    } else {
        image
            .write_to(&mut Cursor::new(&mut buffer), format)
            .map_err(encode_error)?;
    }

    write_atomically(path, &buffer)?;

    debug!(path = %path.display(), format = ?format, bytes = buffer.len(), "Mosaic written");
    Ok(buffer.len() as u64)
}

fn write_atomically(path: &Path, data: &[u8]) -> Result<(), RasterError> {
    let file_name = path.file_name().unwrap_or_default().to_string_lossy();
    let temp_path = path.with_file_name(format!(".{}.{}.tmp", file_name, std::process::id()));
    let write_error = |source| RasterError::Write {
        path: path.to_path_buf(),
        source,
    };

    let result = std::fs::write(&temp_path, data).and_then(|()| std::fs::rename(&temp_path, path));
    if let Err(source) = result {
        if let Err(e) = std::fs::remove_file(&temp_path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %temp_path.display(), error = %e, "Failed to remove temp file");
            }
        }
        return Err(write_error(source));
    }
    Ok(())
}
