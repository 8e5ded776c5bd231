//! Projection of the canonical buffer into presentation buffers.
//!
//! The projector is stateless: every call derives a new [`RenderableBuffer`]
//! from the canonical [`PixelBuffer`] and a [`ChannelSelection`]. Rendered
//! buffers own their bytes and never alias the canonical storage.
//!
//! Scale-to-fit helpers are provided for presentation sinks that draw into a
//! fixed-size area: the aspect ratio is preserved and nothing is cropped.

use serde::{Deserialize, Serialize};

use crate::buffer::{PixelBuffer, CHANNELS};
use crate::channel::{isolate_channel, ChannelSelection};

/// Pixel layout expected by the presentation sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DisplayLayout {
    /// Packed RGB, 3 bytes per pixel.
    #[default]
    Rgb8,
    /// Packed RGBA with opaque alpha, 4 bytes per pixel (canvas `ImageData`).
    Rgba8,
}

impl DisplayLayout {
    /// Bytes per pixel in this layout.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            DisplayLayout::Rgb8 => 3,
            DisplayLayout::Rgba8 => 4,
        }
    }
}

/// Filter used when scaling a rendered buffer for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    #[default]
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// A derived, display-ready copy of the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderableBuffer {
    pub width: u32,
    pub height: u32,
    pub layout: DisplayLayout,
    pub pixels: Vec<u8>,
}

impl RenderableBuffer {
    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width as usize * self.layout.bytes_per_pixel()
    }
}

/// Project `buffer` through `selection` into `layout`.
pub fn project(
    buffer: &PixelBuffer,
    selection: ChannelSelection,
    layout: DisplayLayout,
) -> RenderableBuffer {
    let rgb = isolate_channel(buffer, selection);
    let pixels = match layout {
        DisplayLayout::Rgb8 => rgb,
        DisplayLayout::Rgba8 => rgb_to_rgba(&rgb),
    };
    RenderableBuffer {
        width: buffer.width(),
        height: buffer.height(),
        layout,
        pixels,
    }
}

fn rgb_to_rgba(rgb: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(rgb.len() / CHANNELS * 4);
    for px in rgb.chunks_exact(CHANNELS) {
        out.extend_from_slice(&[px[0], px[1], px[2], 255]);
    }
    out
}

/// Largest size with the source aspect ratio that fits in `max_width` x `max_height`.
///
/// Upscales as well as downscales. Returns `(0, 0)` if any input is zero.
pub fn fit_dimensions(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 || max_width == 0 || max_height == 0 {
        return (0, 0);
    }

    let scale_w = max_width as f64 / width as f64;
    let scale_h = max_height as f64 / height as f64;
    let scale = scale_w.min(scale_h);

    let new_width = ((width as f64 * scale).round() as u32).clamp(1, max_width);
    let new_height = ((height as f64 * scale).round() as u32).clamp(1, max_height);
    (new_width, new_height)
}

/// Scale a rendered buffer to fit the target area, preserving aspect ratio.
///
/// Returns `None` if the target area is empty or the buffer is malformed.
pub fn scale_to_fit(
    rendered: &RenderableBuffer,
    max_width: u32,
    max_height: u32,
    filter: FilterType,
) -> Option<RenderableBuffer> {
    let (width, height) = fit_dimensions(rendered.width, rendered.height, max_width, max_height);
    if width == 0 || height == 0 {
        return None;
    }
    if (width, height) == (rendered.width, rendered.height) {
        return Some(rendered.clone());
    }

    let filter = filter.to_image_filter();
    let pixels = match rendered.layout {
        DisplayLayout::Rgb8 => {
            let img =
                image::RgbImage::from_raw(rendered.width, rendered.height, rendered.pixels.clone())?;
            image::imageops::resize(&img, width, height, filter).into_raw()
        }
        DisplayLayout::Rgba8 => {
            let img = image::RgbaImage::from_raw(
                rendered.width,
                rendered.height,
                rendered.pixels.clone(),
            )?;
            image::imageops::resize(&img, width, height, filter).into_raw()
        }
    };

    Some(RenderableBuffer {
        width,
        height,
        layout: rendered.layout,
        pixels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> PixelBuffer {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(((x * 255) / width.max(1)) as u8);
                pixels.push(((y * 255) / height.max(1)) as u8);
                pixels.push(128);
            }
        }
        PixelBuffer::from_raw(width, height, pixels).unwrap()
    }

    #[test]
    fn test_project_original_rgb() {
        let buf = gradient(8, 4);
        let out = project(&buf, ChannelSelection::Original, DisplayLayout::Rgb8);
        assert_eq!((out.width, out.height), (8, 4));
        assert_eq!(out.pixels, buf.pixels());
        assert_eq!(out.stride(), 24);
    }

    #[test]
    fn test_project_rgba_adds_opaque_alpha() {
        let buf = PixelBuffer::from_raw(1, 1, vec![1, 2, 3]).unwrap();
        let out = project(&buf, ChannelSelection::Original, DisplayLayout::Rgba8);
        assert_eq!(out.pixels, vec![1, 2, 3, 255]);
        assert_eq!(out.stride(), 4);
    }

    #[test]
    fn test_project_applies_selection() {
        let buf = PixelBuffer::from_raw(1, 1, vec![1, 2, 3]).unwrap();
        let out = project(&buf, ChannelSelection::BlueOnly, DisplayLayout::Rgba8);
        assert_eq!(out.pixels, vec![0, 0, 3, 255]);
    }

    #[test]
    fn test_fit_dimensions_landscape_into_box() {
        assert_eq!(fit_dimensions(6000, 4000, 640, 480), (640, 427));
    }

    #[test]
    fn test_fit_dimensions_portrait_into_box() {
        assert_eq!(fit_dimensions(4000, 6000, 640, 480), (320, 480));
    }

    #[test]
    fn test_fit_dimensions_upscales_small_image() {
        assert_eq!(fit_dimensions(100, 50, 640, 480), (640, 320));
    }

    #[test]
    fn test_fit_dimensions_zero_input() {
        assert_eq!(fit_dimensions(0, 10, 640, 480), (0, 0));
        assert_eq!(fit_dimensions(10, 10, 0, 480), (0, 0));
    }

    #[test]
    fn test_fit_dimensions_extreme_aspect_never_zero() {
        let (w, h) = fit_dimensions(10000, 1, 100, 100);
        assert_eq!(w, 100);
        assert_eq!(h, 1);
    }

    #[test]
    fn test_scale_to_fit_rgb() {
        let buf = gradient(200, 100);
        let rendered = project(&buf, ChannelSelection::Original, DisplayLayout::Rgb8);
        let scaled = scale_to_fit(&rendered, 100, 100, FilterType::Bilinear).unwrap();
        assert_eq!((scaled.width, scaled.height), (100, 50));
        assert_eq!(scaled.pixels.len(), 100 * 50 * 3);
    }

    #[test]
    fn test_scale_to_fit_rgba() {
        let buf = gradient(50, 100);
        let rendered = project(&buf, ChannelSelection::Grayscale, DisplayLayout::Rgba8);
        let scaled = scale_to_fit(&rendered, 640, 480, FilterType::Nearest).unwrap();
        assert_eq!((scaled.width, scaled.height), (240, 480));
        assert_eq!(scaled.pixels.len(), 240 * 480 * 4);
    }

    #[test]
    fn test_scale_to_fit_same_size_is_clone() {
        let buf = gradient(64, 48);
        let rendered = project(&buf, ChannelSelection::Original, DisplayLayout::Rgb8);
        let scaled = scale_to_fit(&rendered, 64, 48, FilterType::Lanczos3).unwrap();
        assert_eq!(scaled, rendered);
    }

    #[test]
    fn test_scale_to_fit_empty_target() {
        let buf = gradient(10, 10);
        let rendered = project(&buf, ChannelSelection::Original, DisplayLayout::Rgb8);
        assert!(scale_to_fit(&rendered, 0, 0, FilterType::Bilinear).is_none());
    }
}
