//! WASM-compatible wrapper types for rendered images.
//!
//! This module provides JavaScript-friendly types that wrap the core SnapEdit
//! types, handling the conversion between Rust and JavaScript data
//! representations.

use snapedit_core::display::{DisplayLayout, FilterType, RenderableBuffer};
use wasm_bindgen::prelude::*;

/// A display-ready image for JavaScript.
///
/// Pixels are row-major with `channels` bytes per pixel: 3 for RGB, 4 for
/// RGBA (the latter can be handed straight to `ImageData`).
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy is made
/// to JavaScript memory as a `Uint8Array`.
#[wasm_bindgen]
pub struct JsRenderable {
    width: u32,
    height: u32,
    layout: DisplayLayout,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsRenderable {
    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per pixel (3 or 4)
    #[wasm_bindgen(getter)]
    pub fn channels(&self) -> u32 {
        self.layout.bytes_per_pixel() as u32
    }

    /// Get the number of bytes in the pixel buffer
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns pixel data as Uint8Array.
    ///
    /// Note: This creates a copy of the pixel data.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {}
}

impl From<RenderableBuffer> for JsRenderable {
    fn from(rendered: RenderableBuffer) -> Self {
        Self {
            width: rendered.width,
            height: rendered.height,
            layout: rendered.layout,
            pixels: rendered.pixels,
        }
    }
}

impl JsRenderable {
    /// Convert back to a core RenderableBuffer. Clones the pixel data.
    pub(crate) fn to_renderable(&self) -> RenderableBuffer {
        RenderableBuffer {
            width: self.width,
            height: self.height,
            layout: self.layout,
            pixels: self.pixels.clone(),
        }
    }
}

/// Convert a u8 filter type value to the core FilterType enum.
///
/// Values:
/// - 0 = Nearest (fastest, lowest quality)
/// - 1 = Bilinear (good balance of speed and quality)
/// - 2 = Lanczos3 (best quality, slowest)
///
/// Any other value defaults to Bilinear.
pub(crate) fn filter_from_u8(value: u8) -> FilterType {
    match value {
        0 => FilterType::Nearest,
        2 => FilterType::Lanczos3,
        _ => FilterType::Bilinear,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(layout: DisplayLayout) -> RenderableBuffer {
        let len = 4 * 2 * layout.bytes_per_pixel();
        RenderableBuffer {
            width: 4,
            height: 2,
            layout,
            pixels: vec![7u8; len],
        }
    }

    #[test]
    fn test_from_rgb_renderable() {
        let js = JsRenderable::from(rendered(DisplayLayout::Rgb8));
        assert_eq!(js.width(), 4);
        assert_eq!(js.height(), 2);
        assert_eq!(js.channels(), 3);
        assert_eq!(js.byte_length(), 24);
    }

    #[test]
    fn test_from_rgba_renderable() {
        let js = JsRenderable::from(rendered(DisplayLayout::Rgba8));
        assert_eq!(js.channels(), 4);
        assert_eq!(js.byte_length(), 32);
    }

    #[test]
    fn test_to_renderable() {
        let source = rendered(DisplayLayout::Rgba8);
        let js = JsRenderable::from(source.clone());
        assert_eq!(js.to_renderable(), source);
        assert_eq!(js.pixels(), source.pixels);
    }

    #[test]
    fn test_filter_from_u8() {
        assert_eq!(filter_from_u8(0), FilterType::Nearest);
        assert_eq!(filter_from_u8(1), FilterType::Bilinear);
        assert_eq!(filter_from_u8(2), FilterType::Lanczos3);
        // Unknown values default to Bilinear
        assert_eq!(filter_from_u8(3), FilterType::Bilinear);
        assert_eq!(filter_from_u8(255), FilterType::Bilinear);
    }
}
