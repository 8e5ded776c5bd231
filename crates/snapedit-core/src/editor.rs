//! The editing session.
//!
//! [`Editor`] owns the canonical [`PixelBuffer`], the active
//! [`ChannelSelection`], the pending brightness delta and the camera
//! session. Each public method corresponds to one user action and returns
//! either the buffer to display next or a typed error.
//!
//! ## State rules
//! - Transforms build a new buffer and swap it in only on success; a failed
//!   call leaves buffer, selection and pending delta untouched.
//! - There is no pristine copy. [`Editor::reset`] resets the view, not the
//!   pixels; once a destructive transform has run the only way back is to
//!   load the file again.
//! - Every method takes `&mut self`, so a camera tick can never interleave
//!   with a transform.

use std::path::Path;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::buffer::PixelBuffer;
use crate::camera::{CameraError, CameraSession, CameraSource, CameraState, NoCamera};
use crate::channel::ChannelSelection;
use crate::config::EditorConfig;
use crate::decode::{decode_image, load_image, DecodeError};
use crate::display::{project, RenderableBuffer};
use crate::transform::{
    apply_brightness, apply_crop, draw_line, CropError, CropRegion, LineError, LineSpec,
};

/// Any failure an editor operation can report.
#[derive(Debug, Error)]
pub enum EditorError {
    /// The operation needs an image and none is loaded.
    #[error("No image loaded")]
    NoImage,

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Crop(#[from] CropError),

    #[error(transparent)]
    Line(#[from] LineError),

    #[error(transparent)]
    Camera(#[from] CameraError),
}

/// A single-image editing session.
pub struct Editor<S: CameraSource = NoCamera> {
    config: EditorConfig,
    canonical: Option<PixelBuffer>,
    selection: ChannelSelection,
    pending_brightness: i32,
    camera: CameraSession<S>,
}

impl Editor<NoCamera> {
    /// Create an editor with no camera backend.
    pub fn new(config: EditorConfig) -> Self {
        Self::with_camera(config, NoCamera)
    }
}

impl Default for Editor<NoCamera> {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl<S: CameraSource> Editor<S> {
    /// Create an editor that captures from `source`.
    pub fn with_camera(config: EditorConfig, source: S) -> Self {
        let camera = CameraSession::new(source, config.poll_interval());
        Self {
            config,
            canonical: None,
            selection: ChannelSelection::Original,
            pending_brightness: 0,
            camera,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// The current canonical buffer, if an image is loaded.
    pub fn canonical(&self) -> Option<&PixelBuffer> {
        self.canonical.as_ref()
    }

    pub fn has_image(&self) -> bool {
        self.canonical.is_some()
    }

    pub fn selection(&self) -> ChannelSelection {
        self.selection
    }

    pub fn pending_brightness(&self) -> i32 {
        self.pending_brightness
    }

    /// Store a brightness delta to apply later, clamped to the configured limit.
    pub fn set_pending_brightness(&mut self, delta: i32) -> i32 {
        self.pending_brightness = self.config.clamp_brightness(delta);
        self.pending_brightness
    }

    pub fn camera(&self) -> &CameraSession<S> {
        &self.camera
    }

    pub fn camera_state(&self) -> CameraState {
        self.camera.state()
    }

    /// Crop region covering the whole current image.
    pub fn suggested_crop_region(&self) -> Option<CropRegion> {
        self.canonical.as_ref().map(CropRegion::full)
    }

    /// Diagonal line across the current image at the default thickness.
    pub fn suggested_line(&self) -> Option<LineSpec> {
        self.canonical.as_ref().map(|buf| {
            LineSpec::new(
                0,
                0,
                buf.width() as i64 - 1,
                buf.height() as i64 - 1,
                self.config.default_line_thickness,
            )
        })
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Load an image file, replacing the current image.
    ///
    /// Stops any running camera stream first.
    pub fn load(&mut self, path: &Path) -> Result<RenderableBuffer, EditorError> {
        self.camera.close();
        let buffer = load_image(path).inspect_err(|e| warn!(error = %e, "load failed"))?;
        Ok(self.install(buffer))
    }

    /// Load an image from memory, replacing the current image.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<RenderableBuffer, EditorError> {
        self.camera.close();
        let buffer = decode_image(bytes).inspect_err(|e| warn!(error = %e, "decode failed"))?;
        Ok(self.install(buffer))
    }

    /// Make `buffer` canonical and reset the view.
    fn install(&mut self, buffer: PixelBuffer) -> RenderableBuffer {
        debug!(
            width = buffer.width(),
            height = buffer.height(),
            "new canonical image"
        );
        self.selection = ChannelSelection::Original;
        self.pending_brightness = 0;
        let rendered = project(&buffer, self.selection, self.config.display_layout);
        self.canonical = Some(buffer);
        rendered
    }

    // ------------------------------------------------------------------
    // Display
    // ------------------------------------------------------------------

    /// Switch the channel view and render it.
    pub fn project(&mut self, selection: ChannelSelection) -> Result<RenderableBuffer, EditorError> {
        let buffer = self.require()?;
        let rendered = project(buffer, selection, self.config.display_layout);
        self.selection = selection;
        debug!(?selection, "channel view changed");
        Ok(rendered)
    }

    /// Render the current image through the current selection.
    pub fn render(&self) -> Result<RenderableBuffer, EditorError> {
        let buffer = self.require()?;
        Ok(project(buffer, self.selection, self.config.display_layout))
    }

    /// Return to the `Original` view and zero the pending brightness.
    ///
    /// Pixels changed by earlier transforms stay changed.
    pub fn reset(&mut self) -> Result<RenderableBuffer, EditorError> {
        let buffer = self.require()?;
        let rendered = project(buffer, ChannelSelection::Original, self.config.display_layout);
        self.selection = ChannelSelection::Original;
        self.pending_brightness = 0;
        debug!("view reset");
        Ok(rendered)
    }

    // ------------------------------------------------------------------
    // Destructive transforms
    // ------------------------------------------------------------------

    /// Crop the image. See [`apply_crop`] for the bounds policy.
    pub fn crop(&mut self, region: CropRegion) -> Result<RenderableBuffer, EditorError> {
        let cropped = apply_crop(self.require()?, region)
            .inspect_err(|e| warn!(error = %e, ?region, "crop rejected"))?;
        Ok(self.replace(cropped, "crop"))
    }

    /// Shift brightness by `delta`, clamped to the configured limit.
    pub fn adjust_brightness(&mut self, delta: i32) -> Result<RenderableBuffer, EditorError> {
        let delta = self.config.clamp_brightness(delta);
        let adjusted = apply_brightness(self.require()?, delta);
        Ok(self.replace(adjusted, "brightness"))
    }

    /// Apply the pending brightness delta.
    pub fn apply_pending_brightness(&mut self) -> Result<RenderableBuffer, EditorError> {
        self.adjust_brightness(self.pending_brightness)
    }

    /// Draw a line in the configured overlay color.
    ///
    /// Thickness above the configured maximum is clamped.
    pub fn draw_line(&mut self, spec: LineSpec) -> Result<RenderableBuffer, EditorError> {
        let spec = LineSpec {
            thickness: self.config.clamp_thickness(spec.thickness),
            ..spec
        };
        let drawn = draw_line(self.require()?, &spec, self.config.overlay_color)
            .inspect_err(|e| warn!(error = %e, "line rejected"))?;
        Ok(self.replace(drawn, "line"))
    }

    fn replace(&mut self, buffer: PixelBuffer, op: &str) -> RenderableBuffer {
        debug!(
            op,
            width = buffer.width(),
            height = buffer.height(),
            "canonical image replaced"
        );
        let rendered = project(&buffer, self.selection, self.config.display_layout);
        self.canonical = Some(buffer);
        rendered
    }

    fn require(&self) -> Result<&PixelBuffer, EditorError> {
        self.canonical.as_ref().ok_or(EditorError::NoImage)
    }

    // ------------------------------------------------------------------
    // Camera
    // ------------------------------------------------------------------

    /// Start streaming from the camera.
    pub fn camera_open(&mut self, now: Duration) -> Result<(), EditorError> {
        Ok(self.camera.open(now)?)
    }

    /// Poll the live stream. Returns a preview when a new frame arrived.
    ///
    /// Live frames are only shown; the canonical image changes on capture.
    pub fn camera_tick(&mut self, now: Duration) -> Option<RenderableBuffer> {
        let frame = self.camera.tick(now)?;
        Some(project(
            &frame,
            ChannelSelection::Original,
            self.config.display_layout,
        ))
    }

    /// Capture one frame, stop the stream and make the frame canonical.
    pub fn camera_capture(&mut self) -> Result<RenderableBuffer, EditorError> {
        let buffer = self.camera.capture_one()?;
        Ok(self.install(buffer))
    }

    /// Stop streaming. Idempotent.
    pub fn camera_close(&mut self) {
        self.camera.close();
    }
}
