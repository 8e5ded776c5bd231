//! Straight-line overlay.
//!
//! Lines are drawn in a single solid color without anti-aliasing. A
//! thickness of 1 uses an 8-connected Bresenham walk; thicker lines paint
//! every pixel whose centre lies within `thickness / 2` of the segment,
//! which gives round caps at both ends.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::buffer::PixelBuffer;

/// Segment endpoints and stroke width.
///
/// Coordinates are signed so that negative input from a caller can be
/// reported as out of bounds rather than being unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSpec {
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
    pub thickness: u32,
}

impl LineSpec {
    pub fn new(x1: i64, y1: i64, x2: i64, y2: i64, thickness: u32) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            thickness,
        }
    }

    fn endpoints_inside(&self, width: u32, height: u32) -> bool {
        let inside = |x: i64, y: i64| x >= 0 && y >= 0 && x < width as i64 && y < height as i64;
        inside(self.x1, self.y1) && inside(self.x2, self.y2)
    }
}

/// Error types for line drawing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    /// An endpoint lies outside the image.
    #[error("Line ({x1}, {y1}) -> ({x2}, {y2}) extends outside the {width}x{height} image")]
    LineOutOfBounds {
        x1: i64,
        y1: i64,
        x2: i64,
        y2: i64,
        width: u32,
        height: u32,
    },

    /// Thickness must be at least one pixel.
    #[error("Line thickness must be at least 1")]
    InvalidThickness,
}

/// Draw `spec` onto a copy of `image` in `color`.
///
/// # Errors
///
/// - `LineOutOfBounds` if any endpoint is outside `[0, width) x [0, height)`
/// - `InvalidThickness` if `spec.thickness` is zero
///
/// On error `image` is not modified (it is only borrowed).
pub fn draw_line(
    image: &PixelBuffer,
    spec: &LineSpec,
    color: [u8; 3],
) -> Result<PixelBuffer, LineError> {
    let (width, height) = image.dimensions();

    if !spec.endpoints_inside(width, height) {
        return Err(LineError::LineOutOfBounds {
            x1: spec.x1,
            y1: spec.y1,
            x2: spec.x2,
            y2: spec.y2,
            width,
            height,
        });
    }
    if spec.thickness == 0 {
        return Err(LineError::InvalidThickness);
    }

    let mut output = image.clone();
    if spec.thickness == 1 {
        stroke_thin(&mut output, spec, color);
    } else {
        stroke_thick(&mut output, spec, color);
    }
    Ok(output)
}

/// Bresenham's line algorithm (all octants).
fn stroke_thin(image: &mut PixelBuffer, spec: &LineSpec, color: [u8; 3]) {
    let (mut x, mut y) = (spec.x1, spec.y1);
    let dx = (spec.x2 - spec.x1).abs();
    let dy = -(spec.y2 - spec.y1).abs();
    let sx = if spec.x1 < spec.x2 { 1 } else { -1 };
    let sy = if spec.y1 < spec.y2 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        plot(image, x, y, color);
        if x == spec.x2 && y == spec.y2 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Fill the capsule of radius `thickness / 2` around the segment.
fn stroke_thick(image: &mut PixelBuffer, spec: &LineSpec, color: [u8; 3]) {
    let radius = spec.thickness as f64 / 2.0;
    let reach = radius.ceil() as i64;
    let (width, height) = (image.width() as i64, image.height() as i64);

    let min_x = (spec.x1.min(spec.x2) - reach).max(0);
    let max_x = (spec.x1.max(spec.x2) + reach).min(width - 1);
    let min_y = (spec.y1.min(spec.y2) - reach).max(0);
    let max_y = (spec.y1.max(spec.y2) + reach).min(height - 1);

    let (ax, ay) = (spec.x1 as f64, spec.y1 as f64);
    let (bx, by) = (spec.x2 as f64, spec.y2 as f64);
    let radius_sq = radius * radius;

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            if distance_sq_to_segment(x as f64, y as f64, ax, ay, bx, by) <= radius_sq {
                plot(image, x, y, color);
            }
        }
    }
}

/// Squared distance from point P to segment AB.
#[inline]
fn distance_sq_to_segment(px: f64, py: f64, ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    let (dx, dy) = (bx - ax, by - ay);
    let len_sq = dx * dx + dy * dy;

    // Degenerate segment: distance to the single point
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((px - ax) * dx + (py - ay) * dy) / len_sq).clamp(0.0, 1.0)
    };

    let (cx, cy) = (ax + t * dx, ay + t * dy);
    (px - cx) * (px - cx) + (py - cy) * (py - cy)
}

#[inline]
fn plot(image: &mut PixelBuffer, x: i64, y: i64, color: [u8; 3]) {
    if x >= 0 && y >= 0 {
        image.put(x as u32, y as u32, color);
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: x1 == width is always rejected and leaves the buffer identical.
        #[test]
        fn prop_one_past_width_rejected(
            (width, height) in (1u32..=50, 1u32..=50),
            (fy1, fx2, fy2) in (0.0f64..1.0, 0.0f64..1.0, 0.0f64..1.0),
            thickness in 1u32..=20,
        ) {
            let img = PixelBuffer::filled(width, height, [9, 9, 9]);
            let before = img.clone();
            let spec = LineSpec::new(
                width as i64,
                (height as f64 * fy1) as i64,
                (width as f64 * fx2) as i64,
                (height as f64 * fy2) as i64,
                thickness,
            );
            let result = draw_line(&img, &spec, [0, 255, 0]);
            let is_out_of_bounds = matches!(result, Err(LineError::LineOutOfBounds { .. }));
            prop_assert!(is_out_of_bounds);
            prop_assert_eq!(img, before);
        }

        /// Property: Both endpoints are always painted for in-bounds lines.
        #[test]
        fn prop_endpoints_painted(
            (width, height) in (1u32..=40, 1u32..=40),
            (fx1, fy1, fx2, fy2) in (0.0f64..1.0, 0.0f64..1.0, 0.0f64..1.0, 0.0f64..1.0),
            thickness in 1u32..=8,
        ) {
            let img = PixelBuffer::filled(width, height, [0, 0, 0]);
            let x1 = (width as f64 * fx1) as u32;
            let y1 = (height as f64 * fy1) as u32;
            let x2 = (width as f64 * fx2) as u32;
            let y2 = (height as f64 * fy2) as u32;
            let spec = LineSpec::new(x1 as i64, y1 as i64, x2 as i64, y2 as i64, thickness);

            let out = draw_line(&img, &spec, [0, 255, 0]).unwrap();
            prop_assert_eq!(out.get(x1, y1), Some([0, 255, 0]));
            prop_assert_eq!(out.get(x2, y2), Some([0, 255, 0]));
            prop_assert_eq!(out.dimensions(), img.dimensions());
        }
    }
}
