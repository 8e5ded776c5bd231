//! Destructive image transforms: crop, brightness and line overlay.
//!
//! Every transform borrows the current buffer and returns a brand-new
//! [`PixelBuffer`](crate::buffer::PixelBuffer). The caller swaps the result in
//! only on success, so a failed transform never leaves a half-written image.
//!
//! # Coordinate System
//!
//! - Crop and line coordinates are in pixels of the current buffer
//! - Origin is the top-left corner
//! - After a crop the new top-left is (0, 0)

mod brightness;
mod crop;
mod line;

pub use brightness::{
    apply_brightness, hsv_to_rgb, rgb_to_hsv, value_of, Hsv, BRIGHTNESS_MAX, BRIGHTNESS_MIN,
};
pub use crop::{apply_crop, CropError, CropRegion};
pub use line::{draw_line, LineError, LineSpec};
