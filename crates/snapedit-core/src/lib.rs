//! SnapEdit Core - single-image editing library
//!
//! This crate provides the core functionality for SnapEdit: image decoding,
//! channel views, destructive transforms (crop, brightness, line overlay),
//! display projection and a cooperative camera session.
//!
//! The [`Editor`] type ties these together into one editing session; the
//! individual modules are usable on their own.

pub mod buffer;
pub mod camera;
pub mod channel;
pub mod config;
pub mod decode;
pub mod display;
pub mod editor;
pub mod luminance;
pub mod transform;

pub use buffer::PixelBuffer;
pub use camera::{CameraError, CameraSession, CameraSource, CameraState, FrameQueue, NoCamera};
pub use channel::{isolate_channel, ChannelSelection};
pub use config::EditorConfig;
pub use decode::{CapturedFrame, DecodeError, FrameLayout};
pub use display::{project, DisplayLayout, RenderableBuffer};
pub use editor::{Editor, EditorError};
pub use transform::{
    apply_brightness, apply_crop, draw_line, CropError, CropRegion, LineError, LineSpec,
};
