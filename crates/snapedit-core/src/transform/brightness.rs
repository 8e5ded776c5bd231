//! Brightness shift in HSV space.
//!
//! Each pixel is converted to hue/saturation/value, the value channel is
//! shifted by a fixed delta and clamped to `[0, 255]`, and the pixel is
//! converted back. Hue and saturation are carried through unchanged, so the
//! shift brightens or darkens without moving colors.
//!
//! ## Value channel
//! V is `max(R, G, B)` on the 0..=255 scale. Because HSV-to-RGB reproduces
//! V exactly in the dominant channel, a shift that does not saturate can be
//! undone by the opposite shift.

use crate::buffer::{PixelBuffer, CHANNELS};

/// Brightness delta bounds accepted by the editor.
pub const BRIGHTNESS_MIN: i32 = -100;
pub const BRIGHTNESS_MAX: i32 = 100;

/// HSV triple. `h` in degrees `[0, 360)`, `s` in `[0, 1]`, `v` in `[0, 255]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f32,
    pub s: f32,
    pub v: f32,
}

/// Convert one RGB pixel to HSV.
#[inline]
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> Hsv {
    let (rf, gf, bf) = (r as f32, g as f32, b as f32);
    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let chroma = max - min;

    let s = if max > 0.0 { chroma / max } else { 0.0 };

    let h = if chroma == 0.0 {
        0.0
    } else if max == rf {
        60.0 * ((gf - bf) / chroma).rem_euclid(6.0)
    } else if max == gf {
        60.0 * ((bf - rf) / chroma + 2.0)
    } else {
        60.0 * ((rf - gf) / chroma + 4.0)
    };

    Hsv { h, s, v: max }
}

/// Convert one HSV triple back to RGB, rounding and clamping each channel.
#[inline]
pub fn hsv_to_rgb(hsv: Hsv) -> [u8; 3] {
    let v = hsv.v.clamp(0.0, 255.0);
    let s = hsv.s.clamp(0.0, 1.0);
    let chroma = v * s;
    let h_prime = hsv.h.rem_euclid(360.0) / 60.0;
    let x = chroma * (1.0 - (h_prime % 2.0 - 1.0).abs());
    let m = v - chroma;

    let (r, g, b) = match h_prime as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };

    [to_channel(r + m), to_channel(g + m), to_channel(b + m)]
}

#[inline]
fn to_channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Shift the HSV value of every pixel by `delta`.
///
/// Works for any delta; results are clamped per pixel, never wrapped.
/// A delta of zero returns an exact copy.
pub fn apply_brightness(image: &PixelBuffer, delta: i32) -> PixelBuffer {
    if delta == 0 {
        return image.clone();
    }

    let mut output = image.clone().into_pixels();
    let shift = delta as f32;

    for px in output.chunks_exact_mut(CHANNELS) {
        let mut hsv = rgb_to_hsv(px[0], px[1], px[2]);
        hsv.v = (hsv.v + shift).clamp(0.0, 255.0);
        px.copy_from_slice(&hsv_to_rgb(hsv));
    }

    // Dimensions are unchanged, so the invariant still holds.
    PixelBuffer::from_raw(image.width(), image.height(), output).unwrap_or_else(|| image.clone())
}

/// Value channel (`max(R, G, B)`) of a pixel.
#[inline]
pub fn value_of(px: [u8; 3]) -> u8 {
    px[0].max(px[1]).max(px[2])
}
