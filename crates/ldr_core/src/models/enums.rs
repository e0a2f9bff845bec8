//! Core enums used throughout the harness.

use serde::{Deserialize, Serialize};

/// Broadcast line standard of the input sample.
///
/// Selects the format flag passed to the decoder and the fixed frame
/// dimensions of the raw RGB output produced by the chroma decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoSystem {
    #[default]
    Ntsc,
    Pal,
}

impl VideoSystem {
    /// Command-line flag understood by the decoder.
    pub fn decoder_flag(&self) -> &'static str {
        match self {
            VideoSystem::Ntsc => "--ntsc",
            VideoSystem::Pal => "--pal",
        }
    }

    /// Decoded frame dimensions (width, height) in pixels.
    pub fn frame_dimensions(&self) -> (u64, u64) {
        match self {
            VideoSystem::Ntsc => (760, 488),
            VideoSystem::Pal => (928, 576),
        }
    }

    /// Size of one decoded frame in bytes: 16-bit samples, 3 channels.
    pub fn frame_bytes(&self) -> u64 {
        let (width, height) = self.frame_dimensions();
        width * height * 3 * 2
    }
}

impl std::fmt::Display for VideoSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VideoSystem::Ntsc => write!(f, "NTSC"),
            VideoSystem::Pal => write!(f, "PAL"),
        }
    }
}
