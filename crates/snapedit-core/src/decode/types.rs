//! Core types for image loading.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for image loading operations.
///
/// File-access failures and content failures are separate variants so the
/// caller can tell "you may not read this file" apart from "this is not an
/// image".
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The process lacks permission to read the file.
    #[error("Permission denied reading {}", .path.display())]
    PermissionDenied { path: PathBuf },

    /// The file could not be read for another reason (missing, a directory, ...).
    #[error("Cannot read {}: {reason}", .path.display())]
    Unreadable { path: PathBuf, reason: String },

    /// The content is not in any supported image format.
    #[error("Unsupported image format{}", display_source(.source_path))]
    UnsupportedFormat { source_path: Option<PathBuf> },

    /// The format was recognized but the data is corrupted or truncated.
    #[error("Cannot decode image{}: {reason}", display_source(.source_path))]
    Undecodable {
        source_path: Option<PathBuf>,
        reason: String,
    },

    /// Decoding succeeded but produced a zero-sized image.
    #[error("Decoded image is empty")]
    EmptyImage,
}

impl DecodeError {
    /// True for failures caused by file access rather than file content.
    pub fn is_access_error(&self) -> bool {
        matches!(
            self,
            DecodeError::PermissionDenied { .. } | DecodeError::Unreadable { .. }
        )
    }
}

fn display_source(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => format!(" {}", p.display()),
        None => String::new(),
    }
}

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    /// Normal (no transformation needed).
    #[default]
    Normal = 1,
    /// Horizontal flip.
    FlipHorizontal = 2,
    /// Rotate 180 degrees.
    Rotate180 = 3,
    /// Vertical flip.
    FlipVertical = 4,
    /// Transpose (flip horizontal + rotate 270 CW).
    Transpose = 5,
    /// Rotate 90 degrees clockwise.
    Rotate90CW = 6,
    /// Transverse (flip horizontal + rotate 90 CW).
    Transverse = 7,
    /// Rotate 270 degrees clockwise (90 CCW).
    Rotate270CW = 8,
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            1 => Orientation::Normal,
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}
