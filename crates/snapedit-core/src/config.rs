//! Editor configuration.
//!
//! All fields have defaults, so a partial JSON object (or an empty one)
//! deserializes into a complete configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::display::DisplayLayout;
use crate::transform::{BRIGHTNESS_MAX, BRIGHTNESS_MIN};

/// Default camera polling interval in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 30;

/// Default overlay color for drawn lines (pure green).
pub const DEFAULT_OVERLAY_COLOR: [u8; 3] = [0, 255, 0];

/// Tunables for an [`Editor`](crate::editor::Editor) session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Interval between camera frame pulls while streaming.
    pub poll_interval_ms: u64,
    /// RGB color used by the line overlay.
    pub overlay_color: [u8; 3],
    /// Thickness suggested to the UI for new lines.
    pub default_line_thickness: u32,
    /// Largest thickness the editor accepts; larger requests are clamped.
    pub max_line_thickness: u32,
    /// Brightness deltas are clamped to `[-limit, limit]`.
    pub brightness_limit: i32,
    /// Pixel layout of rendered buffers.
    pub display_layout: DisplayLayout,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            overlay_color: DEFAULT_OVERLAY_COLOR,
            default_line_thickness: 2,
            max_line_thickness: 20,
            brightness_limit: BRIGHTNESS_MAX,
            display_layout: DisplayLayout::Rgb8,
        }
    }
}

impl EditorConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Polling interval as a `Duration`. Never zero.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    /// Clamp a requested brightness delta to the configured limit.
    ///
    /// The limit is taken by magnitude and never widens the transform's
    /// own `BRIGHTNESS_MIN..=BRIGHTNESS_MAX` range.
    pub fn clamp_brightness(&self, delta: i32) -> i32 {
        let limit = self.brightness_limit.unsigned_abs();
        let upper = BRIGHTNESS_MAX.min(i32::try_from(limit).unwrap_or(i32::MAX));
        let lower = BRIGHTNESS_MIN.max(-upper);
        delta.clamp(lower, upper)
    }

    /// Clamp a requested line thickness to `1..=max_line_thickness`.
    ///
    /// Zero is passed through so the transform can reject it.
    pub fn clamp_thickness(&self, thickness: u32) -> u32 {
        if thickness == 0 {
            return 0;
        }
        thickness.min(self.max_line_thickness.max(1))
    }
}
