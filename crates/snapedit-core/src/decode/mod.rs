//! Getting pixels into the editor.
//!
//! This module provides:
//! - Still-image loading from a path or from memory, with EXIF orientation
//!   correction
//! - Wrapping of already-decoded camera frames
//!
//! Every successful path ends in an RGB [`PixelBuffer`](crate::buffer::PixelBuffer).
//!
//! # Errors
//!
//! File access failures (`PermissionDenied`, `Unreadable`) are reported
//! separately from content failures (`UnsupportedFormat`, `Undecodable`).

mod file;
mod frame;
mod types;

pub use file::{decode_image, load_image};
pub use frame::{CapturedFrame, FrameLayout};
pub use types::{DecodeError, Orientation};
