//! Pixel-space cropping.
//!
//! The crop origin must lie inside the image and is never corrected. The
//! extent, on the other hand, is silently clamped to what remains to the
//! right of and below the origin. Both rules are applied in that order.
//!
//! # Example
//!
//! ```ignore
//! // 100x100 image, request 200x200 starting at (10, 10)
//! let cropped = apply_crop(&image, CropRegion::new(10, 10, 200, 200))?;
//! assert_eq!(cropped.dimensions(), (90, 90));
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::buffer::PixelBuffer;

/// Rectangle to keep, in pixels of the current buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The region covering the whole of `buffer`.
    pub fn full(buffer: &PixelBuffer) -> Self {
        Self::new(0, 0, buffer.width(), buffer.height())
    }
}

/// Error types for crop operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CropError {
    /// The crop origin is not inside the image.
    #[error("Crop origin ({x}, {y}) lies outside the {width}x{height} image")]
    RegionOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// The clamped crop extent is empty.
    #[error("Crop size {width}x{height} is invalid")]
    InvalidCropSize { width: u32, height: u32 },
}

/// Crop `image` to `region`.
///
/// # Returns
///
/// A new `PixelBuffer` holding a copy of the sub-rectangle
/// `[y, y + h') x [x, x + w')`, where `w'` and `h'` are the requested extent
/// clamped to the image.
///
/// # Errors
///
/// - `RegionOutOfBounds` if `region.x >= width` or `region.y >= height`
/// - `InvalidCropSize` if the clamped width or height is zero
pub fn apply_crop(image: &PixelBuffer, region: CropRegion) -> Result<PixelBuffer, CropError> {
    let (src_w, src_h) = image.dimensions();

    if region.x >= src_w || region.y >= src_h {
        return Err(CropError::RegionOutOfBounds {
            x: region.x,
            y: region.y,
            width: src_w,
            height: src_h,
        });
    }

    let out_width = region.width.min(src_w - region.x);
    let out_height = region.height.min(src_h - region.y);

    if out_width == 0 || out_height == 0 {
        return Err(CropError::InvalidCropSize {
            width: out_width,
            height: out_height,
        });
    }

    // Fast path: identity crop
    if out_width == src_w && out_height == src_h {
        return Ok(image.clone());
    }

    let row_bytes = out_width as usize * 3;
    let col_offset = region.x as usize * 3;
    let mut output = Vec::with_capacity(row_bytes * out_height as usize);

    // Copy pixel data row by row
    for y in region.y..region.y + out_height {
        let row = image.row(y);
        output.extend_from_slice(&row[col_offset..col_offset + row_bytes]);
    }

    PixelBuffer::from_raw(out_width, out_height, output).ok_or(CropError::InvalidCropSize {
        width: out_width,
        height: out_height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Create a test image where each pixel has a unique value based on position.
    fn test_image(width: u32, height: u32) -> PixelBuffer {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = ((y * width + x) % 256) as u8;
                pixels.push(v); // R
                pixels.push(v); // G
                pixels.push(v); // B
            }
        }
        PixelBuffer::from_raw(width, height, pixels).unwrap()
    }

    #[test]
    fn test_identity_crop() {
        let img = test_image(50, 50);
        let result = apply_crop(&img, CropRegion::full(&img)).unwrap();
        assert_eq!(result, img);
    }

    #[test]
    fn test_center_crop() {
        let img = test_image(10, 10);
        let result = apply_crop(&img, CropRegion::new(2, 2, 6, 6)).unwrap();

        assert_eq!(result.dimensions(), (6, 6));
        // Value at (2, 2) = 2 * 10 + 2 = 22
        assert_eq!(result.get(0, 0), Some([22, 22, 22]));
        // Value at (7, 7) = 77
        assert_eq!(result.get(5, 5), Some([77, 77, 77]));
    }

    #[test]
    fn test_extent_is_clamped() {
        let img = test_image(100, 100);
        let result = apply_crop(&img, CropRegion::new(10, 10, 200, 200)).unwrap();
        assert_eq!(result.dimensions(), (90, 90));
    }

    #[test]
    fn test_width_clamped_height_kept() {
        let img = test_image(40, 30);
        let result = apply_crop(&img, CropRegion::new(30, 5, 50, 10)).unwrap();
        assert_eq!(result.dimensions(), (10, 10));
    }

    #[test]
    fn test_origin_x_out_of_bounds() {
        let img = test_image(100, 100);
        let err = apply_crop(&img, CropRegion::new(100, 0, 10, 10)).unwrap_err();
        assert_eq!(
            err,
            CropError::RegionOutOfBounds {
                x: 100,
                y: 0,
                width: 100,
                height: 100
            }
        );
    }

    #[test]
    fn test_origin_y_out_of_bounds() {
        let img = test_image(100, 50);
        let err = apply_crop(&img, CropRegion::new(0, 50, 10, 10)).unwrap_err();
        assert!(matches!(err, CropError::RegionOutOfBounds { .. }));
    }

    #[test]
    fn test_zero_extent_is_invalid() {
        let img = test_image(10, 10);
        assert_eq!(
            apply_crop(&img, CropRegion::new(0, 0, 0, 5)).unwrap_err(),
            CropError::InvalidCropSize {
                width: 0,
                height: 5
            }
        );
        assert!(matches!(
            apply_crop(&img, CropRegion::new(3, 3, 4, 0)),
            Err(CropError::InvalidCropSize { .. })
        ));
    }

    #[test]
    fn test_last_pixel_crop() {
        let img = test_image(10, 10);
        let result = apply_crop(&img, CropRegion::new(9, 9, 5, 5)).unwrap();
        assert_eq!(result.dimensions(), (1, 1));
        assert_eq!(result.get(0, 0), Some([99, 99, 99]));
    }

    #[test]
    fn test_sequential_crops() {
        let img = test_image(100, 100);
        let first = apply_crop(&img, CropRegion::new(10, 10, 200, 200)).unwrap();
        assert_eq!(first.dimensions(), (90, 90));

        let second = apply_crop(&first, CropRegion::new(90, 0, 10, 10));
        assert!(matches!(second, Err(CropError::RegionOutOfBounds { .. })));
    }

    #[test]
    fn test_crop_does_not_alias_source() {
        let img = test_image(4, 4);
        let mut cropped = apply_crop(&img, CropRegion::new(1, 1, 2, 2)).unwrap();
        cropped.put(0, 0, [255, 255, 255]);
        assert_eq!(img.get(1, 1), Some([5, 5, 5]));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
