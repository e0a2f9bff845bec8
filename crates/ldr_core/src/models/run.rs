//! Run configuration and caller expectations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::artifacts::OutputBase;
use super::enums::VideoSystem;

/// Optional caller-declared assertions checked after the relevant
/// stage. Each is independently nullable; absence skips that check.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Expectations {
    /// Minimum number of decoded frames in each chroma decoder output.
    pub min_frames: Option<u64>,
    /// Minimum median bPSNR (dB) across fields that carry the metric.
    pub min_bpsnr: Option<f64>,
    /// A VBI triple that must appear on at least one field.
    pub vbi: Option<[i64; 3]>,
    /// Minimum number of stereo sample pairs in the digital audio output.
    pub min_efm_samples: Option<u64>,
}

impl Expectations {
    /// Whether any metadata-based check was requested.
    pub fn wants_metadata(&self) -> bool {
        self.min_bpsnr.is_some() || self.vbi.is_some()
    }
}

/// Immutable configuration for one harness run.
///
/// Built once from caller input, read-only thereafter.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Input sample file fed to the decoder.
    pub input: PathBuf,
    /// Basename all stage output filenames are derived from.
    pub output_base: OutputBase,
    /// Broadcast line standard of the sample.
    pub system: VideoSystem,
    /// Whether the source carries a digital audio subcarrier.
    pub digital_audio: bool,
    /// Chroma decoder variants to exercise; empty means one run with
    /// the tool's own default.
    pub chroma_decoders: Vec<String>,
    /// Caller expectations.
    pub expect: Expectations,
    /// Print commands instead of executing them.
    pub dry_run: bool,
}

impl RunConfig {
    /// Create a configuration with defaults: NTSC, digital audio
    /// enabled, default chroma decoder, no expectations.
    pub fn new(input: impl Into<PathBuf>, output_base: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_base: OutputBase::new(output_base),
            system: VideoSystem::default(),
            digital_audio: true,
            chroma_decoders: Vec::new(),
            expect: Expectations::default(),
            dry_run: false,
        }
    }
}
