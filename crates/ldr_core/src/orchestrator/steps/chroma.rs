//! Chroma decode stage - converts the corrected signal into RGB frames.
//!
//! One instance runs per requested decoder variant; with no variant
//! requested a single instance lets the tool pick its own default.
//! Each run owns (and cleans) the `.rgb` output and is validated
//! independently against the frame-count expectation.

use std::fs;

use crate::models::rgb_frame_count;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{ChromaOutput, Context, RunState, StepOutcome};
use crate::tools::{clean_outputs, ToolCommand};

const TOOL: &str = "ld-chroma-decoder";

/// Output suffixes owned (and cleaned) by this stage.
const OWNED_SUFFIXES: &[&str] = &[".rgb"];

pub struct ChromaStep {
    /// Decoder variant passed to the tool; `None` lets the tool pick.
    decoder: Option<String>,
    /// Stage name shown in logs, includes the variant.
    name: String,
}

impl ChromaStep {
    /// A run with an explicit decoder variant.
    pub fn with_decoder(decoder: impl Into<String>) -> Self {
        let decoder = decoder.into();
        Self {
            name: format!("Chroma Decode ({})", decoder),
            decoder: Some(decoder),
        }
    }

    /// A run with the tool's default decoder.
    pub fn default_decoder() -> Self {
        Self {
            decoder: None,
            name: "Chroma Decode".to_string(),
        }
    }

    /// The variant this instance exercises.
    pub fn decoder(&self) -> Option<&str> {
        self.decoder.as_deref()
    }
}

impl PipelineStep for ChromaStep {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Decode the corrected signal into raw RGB frames"
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        if !ctx.checks_enabled() {
            return Ok(());
        }
        let doc_tbc = ctx.base().with_suffix(".doc.tbc");
        if !doc_tbc.exists() {
            return Err(StepError::file_not_found(doc_tbc.display().to_string()));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome> {
        if !ctx.config.dry_run {
            clean_outputs(ctx.base(), OWNED_SUFFIXES)?;
        }

        let rgb = ctx.base().with_suffix(".rgb");
        let mut cmd = ToolCommand::new(&ctx.env, TOOL);
        if let Some(decoder) = &self.decoder {
            cmd = cmd.arg("-f").arg(decoder);
        }
        let cmd = cmd.arg(ctx.base().with_suffix(".doc.tbc")).arg(&rgb);

        ctx.runner().run(&cmd)?;

        state.chroma.push(ChromaOutput {
            decoder: self.decoder.clone(),
            rgb,
        });
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, ctx: &Context, _state: &RunState) -> StepResult<()> {
        if !ctx.checks_enabled() {
            return Ok(());
        }
        let Some(min_frames) = ctx.config.expect.min_frames else {
            return Ok(());
        };

        let rgb = ctx.base().with_suffix(".rgb");
        let len = fs::metadata(&rgb)
            .map_err(|e| StepError::io_error(format!("inspecting {}", rgb.display()), e))?
            .len();

        let frames = rgb_frame_count(len, ctx.config.system);
        if frames < min_frames {
            return Err(StepError::validation_failed(format!(
                "{} decoded frames in {} below expected {}",
                frames,
                rgb.display(),
                min_frames
            )));
        }

        ctx.logger.validation(&format!(
            "{} decoded frames (expected at least {})",
            frames, min_frames
        ));
        Ok(())
    }
}
