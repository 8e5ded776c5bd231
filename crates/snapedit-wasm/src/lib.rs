//! SnapEdit WASM - WebAssembly bindings for SnapEdit
//!
//! This crate provides WASM bindings to expose the snapedit-core editing
//! session to JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `editor` - The editing session (load, channel views, transforms, camera)
//! - `display` - Scale-to-fit for canvas drawing
//! - `types` - WASM-compatible wrapper types for rendered images
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsEditor } from '@snapedit/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const editor = new JsEditor();
//! const view = editor.load_bytes(new Uint8Array(await file.arrayBuffer()));
//! console.log(`Loaded ${view.width}x${view.height}`);
//! ```

use wasm_bindgen::prelude::*;

mod display;
mod editor;
mod types;

// Re-export public types
pub use display::{fit_dimensions, scale_to_fit};
pub use editor::JsEditor;
pub use types::JsRenderable;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
