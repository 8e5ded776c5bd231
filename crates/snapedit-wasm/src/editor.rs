//! Editor session WASM bindings.
//!
//! [`JsEditor`] wraps a core [`Editor`] whose camera is fed from JavaScript:
//! the page grabs frames from its video element and hands them over with
//! [`JsEditor::push_frame`], then drives the session from a timer with
//! [`JsEditor::camera_tick`].
//!
//! # Example
//!
//! ```typescript
//! const editor = new JsEditor();
//! let view = editor.load_bytes(new Uint8Array(await file.arrayBuffer()));
//! view = editor.crop(10, 10, 200, 200);
//!
//! editor.camera_open(performance.now());
//! setInterval(() => {
//!   editor.push_frame(w, h, grabRgb(video), false);
//!   const preview = editor.camera_tick(performance.now());
//!   if (preview) draw(preview);
//! }, 30);
//! ```

use std::time::Duration;

use crate::types::JsRenderable;
use snapedit_core::camera::{CameraState, FrameQueue};
use snapedit_core::channel::ChannelSelection;
use snapedit_core::config::EditorConfig;
use snapedit_core::decode::{CapturedFrame, FrameLayout};
use snapedit_core::editor::{Editor, EditorError};
use snapedit_core::transform::{CropRegion, LineSpec};
use wasm_bindgen::prelude::*;

fn to_js_error(err: EditorError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Convert a `performance.now()` style timestamp to a `Duration`.
///
/// Negative and NaN values map to zero; values too large for a `Duration`
/// saturate to `Duration::MAX`.
pub(crate) fn duration_from_ms(ms: f64) -> Duration {
    if ms.is_nan() || ms <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(ms / 1000.0).unwrap_or(Duration::MAX)
}

/// An editing session for JavaScript.
#[wasm_bindgen]
pub struct JsEditor {
    inner: Editor<FrameQueue>,
    frames: FrameQueue,
}

impl Default for JsEditor {
    fn default() -> Self {
        Self::with_editor_config(EditorConfig::default())
    }
}

impl JsEditor {
    fn with_editor_config(config: EditorConfig) -> Self {
        let frames = FrameQueue::new();
        Self {
            inner: Editor::with_camera(config, frames.clone()),
            frames,
        }
    }
}

#[wasm_bindgen]
impl JsEditor {
    /// Create an editor with default settings
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an editor from a (possibly partial) config object
    pub fn with_config(config: JsValue) -> Result<JsEditor, JsValue> {
        let config: EditorConfig =
            serde_wasm_bindgen::from_value(config).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self::with_editor_config(config))
    }

    /// Current config as a plain object
    pub fn config(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.config())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(getter)]
    pub fn has_image(&self) -> bool {
        self.inner.has_image()
    }

    /// Active channel view index (0=Original ... 4=Grayscale)
    #[wasm_bindgen(getter)]
    pub fn selection(&self) -> u32 {
        self.inner.selection().index()
    }

    #[wasm_bindgen(getter)]
    pub fn pending_brightness(&self) -> i32 {
        self.inner.pending_brightness()
    }

    #[wasm_bindgen(setter)]
    pub fn set_pending_brightness(&mut self, delta: i32) {
        self.inner.set_pending_brightness(delta);
    }

    #[wasm_bindgen(getter)]
    pub fn camera_streaming(&self) -> bool {
        self.inner.camera_state() == CameraState::Streaming
    }

    /// Decode an image file's bytes and make it the current image
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<JsRenderable, JsValue> {
        self.inner
            .load_bytes(bytes)
            .map(JsRenderable::from)
            .map_err(to_js_error)
    }

    /// Switch the channel view. Unknown indices select Original.
    pub fn project(&mut self, selection: u32) -> Result<JsRenderable, JsValue> {
        self.inner
            .project(ChannelSelection::from_index(selection))
            .map(JsRenderable::from)
            .map_err(to_js_error)
    }

    /// Render the current image through the current view
    pub fn render(&self) -> Result<JsRenderable, JsValue> {
        self.inner
            .render()
            .map(JsRenderable::from)
            .map_err(to_js_error)
    }

    pub fn crop(&mut self, x: u32, y: u32, width: u32, height: u32) -> Result<JsRenderable, JsValue> {
        self.inner
            .crop(CropRegion::new(x, y, width, height))
            .map(JsRenderable::from)
            .map_err(to_js_error)
    }

    pub fn adjust_brightness(&mut self, delta: i32) -> Result<JsRenderable, JsValue> {
        self.inner
            .adjust_brightness(delta)
            .map(JsRenderable::from)
            .map_err(to_js_error)
    }

    pub fn apply_pending_brightness(&mut self) -> Result<JsRenderable, JsValue> {
        self.inner
            .apply_pending_brightness()
            .map(JsRenderable::from)
            .map_err(to_js_error)
    }

    pub fn draw_line(
        &mut self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        thickness: u32,
    ) -> Result<JsRenderable, JsValue> {
        let spec = LineSpec::new(x1.into(), y1.into(), x2.into(), y2.into(), thickness);
        self.inner
            .draw_line(spec)
            .map(JsRenderable::from)
            .map_err(to_js_error)
    }

    /// Return to the Original view. Does not undo transforms.
    pub fn reset(&mut self) -> Result<JsRenderable, JsValue> {
        self.inner
            .reset()
            .map(JsRenderable::from)
            .map_err(to_js_error)
    }

    /// Mark the page's video source as connected or not
    pub fn set_camera_available(&mut self, available: bool) {
        self.frames.set_available(available);
    }

    /// Hand a captured frame to the camera session.
    ///
    /// `pixels` is packed 3 bytes per pixel, BGR order when `bgr` is set.
    pub fn push_frame(&mut self, width: u32, height: u32, pixels: Vec<u8>, bgr: bool) {
        let layout = if bgr { FrameLayout::Bgr } else { FrameLayout::Rgb };
        self.frames.push(CapturedFrame::new(width, height, layout, pixels));
    }

    pub fn camera_open(&mut self, now_ms: f64) -> Result<(), JsValue> {
        self.inner
            .camera_open(duration_from_ms(now_ms))
            .map_err(to_js_error)
    }

    /// Poll the stream. Returns a preview when a frame was due and available.
    pub fn camera_tick(&mut self, now_ms: f64) -> Option<JsRenderable> {
        self.inner
            .camera_tick(duration_from_ms(now_ms))
            .map(JsRenderable::from)
    }

    /// Capture one frame, stop streaming and make it the current image
    pub fn camera_capture(&mut self) -> Result<JsRenderable, JsValue> {
        self.inner
            .camera_capture()
            .map(JsRenderable::from)
            .map_err(to_js_error)
    }

    pub fn camera_close(&mut self) {
        self.inner.camera_close();
    }
}
