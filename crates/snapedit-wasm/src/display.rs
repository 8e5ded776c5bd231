//! Display scaling WASM bindings.
//!
//! Canvas hosts draw into a fixed-size area; [`scale_to_fit`] resizes a
//! rendered image to that area without cropping or distorting it.
//!
//! # Example
//!
//! ```typescript
//! const rendered = editor.project(1);
//! const shown = scale_to_fit(rendered, canvas.width, canvas.height, 1);
//! ```

use crate::types::{filter_from_u8, JsRenderable};
use snapedit_core::display;
use wasm_bindgen::prelude::*;

/// Scale a rendered image to fit within `max_width` x `max_height`.
///
/// # Arguments
///
/// * `image` - The rendered image
/// * `max_width` - Width of the drawing area
/// * `max_height` - Height of the drawing area
/// * `filter` - Filter type: 0=Nearest, 1=Bilinear, 2=Lanczos3
///
/// # Returns
///
/// The scaled image, or `undefined` if the drawing area is empty.
#[wasm_bindgen]
pub fn scale_to_fit(
    image: &JsRenderable,
    max_width: u32,
    max_height: u32,
    filter: u8,
) -> Option<JsRenderable> {
    display::scale_to_fit(
        &image.to_renderable(),
        max_width,
        max_height,
        filter_from_u8(filter),
    )
    .map(JsRenderable::from)
}

/// Compute the size `scale_to_fit` would produce, as `[width, height]`.
#[wasm_bindgen]
pub fn fit_dimensions(width: u32, height: u32, max_width: u32, max_height: u32) -> Vec<u32> {
    let (w, h) = display::fit_dimensions(width, height, max_width, max_height);
    vec![w, h]
}
