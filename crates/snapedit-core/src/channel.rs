//! Display-only channel isolation.
//!
//! A [`ChannelSelection`] never changes the canonical buffer. It only decides
//! how the buffer is derived for display, so switching back to
//! [`ChannelSelection::Original`] always shows the untouched pixels again.

use serde::{Deserialize, Serialize};

use crate::buffer::{PixelBuffer, CHANNELS};
use crate::luminance::calculate_luma_u8;

/// Which view of the image is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChannelSelection {
    /// All channels as stored.
    #[default]
    Original,
    /// Red channel only; green and blue zeroed.
    RedOnly,
    /// Green channel only; red and blue zeroed.
    GreenOnly,
    /// Blue channel only; red and green zeroed.
    BlueOnly,
    /// Luma replicated into all three channels.
    Grayscale,
}

impl ChannelSelection {
    /// All selections in combo-box order.
    pub const ALL: [ChannelSelection; 5] = [
        ChannelSelection::Original,
        ChannelSelection::RedOnly,
        ChannelSelection::GreenOnly,
        ChannelSelection::BlueOnly,
        ChannelSelection::Grayscale,
    ];

    /// Map a UI list index (0..=4) to a selection. Unknown indices fall back
    /// to `Original`.
    pub fn from_index(index: u32) -> Self {
        Self::ALL
            .get(index as usize)
            .copied()
            .unwrap_or(ChannelSelection::Original)
    }

    /// Position of this selection in [`ChannelSelection::ALL`].
    pub fn index(self) -> u32 {
        match self {
            ChannelSelection::Original => 0,
            ChannelSelection::RedOnly => 1,
            ChannelSelection::GreenOnly => 2,
            ChannelSelection::BlueOnly => 3,
            ChannelSelection::Grayscale => 4,
        }
    }

    /// Index of the channel kept by a single-channel selection.
    fn kept_channel(self) -> Option<usize> {
        match self {
            ChannelSelection::RedOnly => Some(0),
            ChannelSelection::GreenOnly => Some(1),
            ChannelSelection::BlueOnly => Some(2),
            _ => None,
        }
    }
}

/// Derive the RGB bytes for `selection` from `buffer`.
///
/// The result is a fresh allocation; `buffer` is only read.
pub fn isolate_channel(buffer: &PixelBuffer, selection: ChannelSelection) -> Vec<u8> {
    let src = buffer.pixels();

    match selection {
        ChannelSelection::Original => src.to_vec(),
        ChannelSelection::Grayscale => {
            let mut out = Vec::with_capacity(src.len());
            for px in src.chunks_exact(CHANNELS) {
                let luma = calculate_luma_u8(px[0], px[1], px[2]);
                out.extend_from_slice(&[luma, luma, luma]);
            }
            out
        }
        single => {
            let keep = single.kept_channel().unwrap_or(0);
            let mut out = vec![0u8; src.len()];
            for (dst, px) in out
                .chunks_exact_mut(CHANNELS)
                .zip(src.chunks_exact(CHANNELS))
            {
                dst[keep] = px[keep];
            }
            out
        }
    }
}
