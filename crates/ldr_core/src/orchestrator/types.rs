//! Core types for the stage pipeline.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use crate::config::Settings;
use crate::logging::RunLogger;
use crate::models::{OutputBase, RunConfig};
use crate::tools::{ToolEnv, ToolRunner};

/// Read-only context passed to pipeline stages.
///
/// Contains the run configuration and shared resources that stages can
/// read but not modify. Mutable state goes in [`RunState`].
pub struct Context {
    /// Immutable run configuration.
    pub config: RunConfig,
    /// Harness settings.
    pub settings: Settings,
    /// Prepared environment snapshot.
    pub env: ToolEnv,
    /// Per-run logger.
    pub logger: Arc<RunLogger>,
}

impl Context {
    /// Create a new context for a run.
    pub fn new(
        config: RunConfig,
        settings: Settings,
        env: ToolEnv,
        logger: Arc<RunLogger>,
    ) -> Self {
        Self {
            config,
            settings,
            env,
            logger,
        }
    }

    /// The shared output basename.
    pub fn base(&self) -> &OutputBase {
        &self.config.output_base
    }

    /// A runner bound to this run's environment and dry-run mode.
    pub fn runner(&self) -> ToolRunner<'_> {
        ToolRunner::new(&self.env, &self.logger, self.config.dry_run)
    }

    /// Whether artifact preconditions and output validations apply.
    ///
    /// In dry-run mode nothing is produced, so there is nothing to
    /// inspect; only command construction is exercised.
    pub fn checks_enabled(&self) -> bool {
        !self.config.dry_run
    }
}

/// Mutable run state that accumulates results from pipeline stages.
///
/// Stages append their own section and never overwrite another
/// stage's entry.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunState {
    /// When the run started.
    pub started_at: Option<String>,
    /// Decode stage artifacts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decode: Option<DecodeOutput>,
    /// VBI processing artifacts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vbi: Option<VbiOutput>,
    /// Metadata export artifacts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export: Option<ExportOutput>,
    /// Digital audio decode artifacts (absent when skipped).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub efm: Option<EfmOutput>,
    /// Dropout correction artifacts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dropout: Option<DropoutOutput>,
    /// One entry per chroma decoder run.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub chroma: Vec<ChromaOutput>,
}

impl RunState {
    /// Create a new run state stamped with the current time.
    pub fn new() -> Self {
        Self {
            started_at: Some(chrono::Local::now().to_rfc3339()),
            ..Default::default()
        }
    }
}

/// Output from the decode stage.
#[derive(Debug, Clone, Serialize)]
pub struct DecodeOutput {
    /// The time-base-corrected video file.
    pub tbc: PathBuf,
    /// The JSON metadata sidecar.
    pub metadata: PathBuf,
}

/// Output from the VBI processing stage.
#[derive(Debug, Clone, Serialize)]
pub struct VbiOutput {
    /// Backup of the sidecar as it was before VBI processing.
    pub backup: PathBuf,
}

/// Output from the metadata export stage.
#[derive(Debug, Clone, Serialize)]
pub struct ExportOutput {
    pub vits_csv: PathBuf,
    pub vbi_csv: PathBuf,
    pub ffmetadata: PathBuf,
}

/// Output from the digital audio decode stage.
#[derive(Debug, Clone, Serialize)]
pub struct EfmOutput {
    /// Decoded stereo PCM samples.
    pub digital_pcm: PathBuf,
}

/// Output from the dropout correction stage.
#[derive(Debug, Clone, Serialize)]
pub struct DropoutOutput {
    /// The corrected time-base file.
    pub doc_tbc: PathBuf,
}

/// Output from one chroma decoder run.
#[derive(Debug, Clone, Serialize)]
pub struct ChromaOutput {
    /// Decoder variant used; `None` means the tool's default.
    pub decoder: Option<String>,
    /// Raw interleaved RGB frames.
    pub rgb: PathBuf,
}

/// Result of executing a pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Stage completed successfully.
    Success,
    /// Stage was skipped (disabled by configuration, not an error).
    Skipped(String),
}
