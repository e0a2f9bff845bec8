//! Artifact naming and size-derived sample accounting.
//!
//! Every file the toolchain produces is named `<basename><suffix>`.
//! Stages never guess a different basename; they derive paths through
//! [`OutputBase`] so each stage consumes exactly the suffixes the
//! previous stage is documented to produce.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::enums::VideoSystem;

/// The shared output basename all stage artifacts are derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputBase(PathBuf);

impl OutputBase {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self(base.into())
    }

    /// The bare basename path, as passed to tools that append their
    /// own suffixes.
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Derive an artifact path by suffix concatenation,
    /// e.g. `.tbc` -> `<base>.tbc`.
    pub fn with_suffix(&self, suffix: &str) -> PathBuf {
        let mut name = self.0.clone().into_os_string();
        name.push(suffix);
        PathBuf::from(name)
    }

    /// Directory that will hold the artifacts (parent of the basename).
    pub fn dir(&self) -> Option<&Path> {
        self.0.parent().filter(|p| !p.as_os_str().is_empty())
    }

    /// Final component of the basename, used for log file naming.
    pub fn name(&self) -> String {
        self.0
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string())
    }
}

impl std::fmt::Display for OutputBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Number of stereo sample pairs in a raw digital audio file:
/// 2 bytes per sample, 2 channels.
pub fn stereo_sample_pairs(file_len: u64) -> u64 {
    file_len / 4
}

/// Number of whole decoded frames in a raw RGB file for the given
/// line standard.
pub fn rgb_frame_count(file_len: u64, system: VideoSystem) -> u64 {
    file_len / system.frame_bytes()
}
