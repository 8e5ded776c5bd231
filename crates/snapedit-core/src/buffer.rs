//! The canonical pixel buffer.
//!
//! Every editing operation reads a [`PixelBuffer`] and, when it succeeds,
//! produces a new one that replaces the previous state wholesale.

/// Number of interleaved channels per pixel (R, G, B).
pub const CHANNELS: usize = 3;

/// An RGB image with 8 bits per channel.
///
/// Storage is row-major and interleaved. The buffer is never empty:
/// `width` and `height` are both non-zero and `pixels.len()` always equals
/// `width * height * 3`. The fields are private so that invariant cannot be
/// broken from outside; use [`PixelBuffer::from_raw`] to build one from parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Build a buffer from raw RGB bytes.
    ///
    /// Returns `None` if either dimension is zero or the byte count does not
    /// match `width * height * 3`.
    pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        if pixels.len() != byte_len(width, height) {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a buffer filled with a single color.
    ///
    /// Zero dimensions are bumped to 1 so the result is always valid.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let pixels = rgb
            .iter()
            .copied()
            .cycle()
            .take(byte_len(width, height))
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a buffer from an `image::RgbImage`.
    ///
    /// Returns `None` for a zero-sized image.
    pub fn from_rgb_image(img: image::RgbImage) -> Option<Self> {
        let (width, height) = img.dimensions();
        Self::from_raw(width, height, img.into_raw())
    }

    /// Convert to an `image::RgbImage` for use with `image::imageops`.
    pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)` pair.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw interleaved RGB bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Consume the buffer, returning its bytes.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Size of the pixel storage in bytes.
    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }

    /// Read one pixel. Returns `None` outside the image.
    pub fn get(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.index(x, y);
        Some([self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]])
    }

    /// Write one pixel. Writes outside the image are ignored.
    pub fn put(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = self.index(x, y);
        self.pixels[idx..idx + CHANNELS].copy_from_slice(&rgb);
    }

    /// Byte slice of a single row. `y` must be below the height.
    pub(crate) fn row(&self, y: u32) -> &[u8] {
        let stride = self.stride();
        let start = y as usize * stride;
        &self.pixels[start..start + stride]
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width as usize * CHANNELS
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }
}

#[inline]
pub(crate) fn byte_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * CHANNELS
}
