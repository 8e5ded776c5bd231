//! Still-image loading with EXIF orientation handling.
//!
//! Any container the `image` crate is built with (PNG, JPEG, BMP, GIF) is
//! accepted. The format is guessed from the content, not the extension.

use std::io::{self, Cursor};
use std::path::{Path, PathBuf};

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageError, ImageReader};
use tracing::{debug, warn};

use super::{DecodeError, Orientation};
use crate::buffer::PixelBuffer;

/// Load an image file into a [`PixelBuffer`].
///
/// # Errors
///
/// - `PermissionDenied` if the file exists but may not be read
/// - `Unreadable` for any other I/O failure
/// - `UnsupportedFormat` / `Undecodable` if the bytes are not a valid image
/// - `EmptyImage` if the decoder produced a zero-sized image
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn load_image(path: &Path) -> Result<PixelBuffer, DecodeError> {
    let bytes = std::fs::read(path).map_err(|e| classify_io_error(path, &e))?;
    let buffer = decode_with_source(&bytes, Some(path))?;
    debug!(
        width = buffer.width(),
        height = buffer.height(),
        "loaded image"
    );
    Ok(buffer)
}

/// Decode an in-memory image, applying EXIF orientation correction.
pub fn decode_image(bytes: &[u8]) -> Result<PixelBuffer, DecodeError> {
    decode_with_source(bytes, None)
}

fn decode_with_source(bytes: &[u8], path: Option<&Path>) -> Result<PixelBuffer, DecodeError> {
    let orientation = extract_orientation(bytes);
    let img = decode_dynamic(bytes, path)?;
    let oriented = apply_orientation(img, orientation);
    PixelBuffer::from_rgb_image(oriented.into_rgb8()).ok_or(DecodeError::EmptyImage)
}

fn decode_dynamic(bytes: &[u8], path: Option<&Path>) -> Result<DynamicImage, DecodeError> {
    let source_path = path.map(Path::to_path_buf);

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::Undecodable {
            source_path: source_path.clone(),
            reason: e.to_string(),
        })?;

    if reader.format().is_none() {
        warn!("image format not recognized");
        return Err(DecodeError::UnsupportedFormat { source_path });
    }

    reader.decode().map_err(|e| match e {
        ImageError::Unsupported(_) => DecodeError::UnsupportedFormat { source_path },
        other => {
            warn!(error = %other, "image decode failed");
            DecodeError::Undecodable {
                source_path,
                reason: other.to_string(),
            }
        }
    })
}

/// Map a file read failure to the matching access error.
pub(crate) fn classify_io_error(path: &Path, err: &io::Error) -> DecodeError {
    let path = PathBuf::from(path);
    match err.kind() {
        io::ErrorKind::PermissionDenied => DecodeError::PermissionDenied { path },
        _ => DecodeError::Unreadable {
            path,
            reason: err.to_string(),
        },
    }
}

fn extract_orientation(bytes: &[u8]) -> Orientation {
    let exif_reader = Reader::new();
    let mut cursor = Cursor::new(bytes);

    match exif_reader.read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
