//! Decode stage - runs the primary decoder on the input sample.
//!
//! Produces the time-base-corrected video file, its JSON metadata
//! sidecar and, when the source carries a digital audio subcarrier,
//! the raw EFM data stream. The install root is prepended to the
//! search path so the decoder finds its co-located helper programs.

use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, DecodeOutput, RunState, StepOutcome};
use crate::tools::{clean_outputs, ToolCommand};

const TOOL: &str = "ld-decode";

/// Output suffixes owned (and cleaned) by this stage.
const OWNED_SUFFIXES: &[&str] = &[".tbc", ".tbc.json", ".efm", ".pcm"];

pub struct DecodeStep;

impl DecodeStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DecodeStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for DecodeStep {
    fn name(&self) -> &str {
        "Decode"
    }

    fn description(&self) -> &str {
        "Decode the input sample into a time-base-corrected file"
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        if !ctx.checks_enabled() {
            return Ok(());
        }
        if !ctx.config.input.exists() {
            return Err(StepError::file_not_found(ctx.config.input.display().to_string()));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome> {
        if !ctx.config.dry_run {
            clean_outputs(ctx.base(), OWNED_SUFFIXES)?;
        }

        let cmd = ToolCommand::new(&ctx.env, TOOL)
            .arg("--ignoreleadout")
            .arg(ctx.config.system.decoder_flag())
            .arg(&ctx.config.input)
            .arg(ctx.base().as_path())
            .env("PATH", ctx.env.search_path_with_root());

        ctx.runner().run(&cmd)?;

        state.decode = Some(DecodeOutput {
            tbc: ctx.base().with_suffix(".tbc"),
            metadata: ctx.base().with_suffix(".tbc.json"),
        });
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, _state: &RunState) -> StepResult<()> {
        Ok(())
    }
}
