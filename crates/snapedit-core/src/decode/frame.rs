//! Raw camera frames.
//!
//! Frames arrive already decoded, so wrapping one is only a byte-order fix-up.

use serde::{Deserialize, Serialize};

use crate::buffer::{byte_len, PixelBuffer, CHANNELS};

/// Byte order of an incoming 3-channel frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FrameLayout {
    /// Red, green, blue.
    #[default]
    Rgb,
    /// Blue, green, red (common for capture drivers).
    Bgr,
}

/// A single frame as delivered by a camera device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedFrame {
    pub width: u32,
    pub height: u32,
    pub layout: FrameLayout,
    pub pixels: Vec<u8>,
}

impl CapturedFrame {
    pub fn new(width: u32, height: u32, layout: FrameLayout, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            layout,
            pixels,
        }
    }

    /// True when the frame carries no usable pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.len() != byte_len(self.width, self.height)
    }
}

impl PixelBuffer {
    /// Wrap a captured frame as a canonical buffer.
    ///
    /// BGR frames are reordered to RGB. Returns `None` for an empty or
    /// malformed frame.
    pub fn from_captured_frame(frame: CapturedFrame) -> Option<Self> {
        if frame.is_empty() {
            return None;
        }
        let CapturedFrame {
            width,
            height,
            layout,
            mut pixels,
        } = frame;

        if layout == FrameLayout::Bgr {
            for px in pixels.chunks_exact_mut(CHANNELS) {
                px.swap(0, 2);
            }
        }
        PixelBuffer::from_raw(width, height, pixels)
    }
}
