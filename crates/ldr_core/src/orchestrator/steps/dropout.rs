//! Dropout correction stage - patches transient signal-loss regions.

use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, DropoutOutput, RunState, StepOutcome};
use crate::tools::{clean_outputs, ToolCommand};

const TOOL: &str = "ld-dropout-correct";

/// Output suffixes owned (and cleaned) by this stage.
const OWNED_SUFFIXES: &[&str] = &[".doc.tbc", ".doc.tbc.json"];

pub struct DropoutStep;

impl DropoutStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DropoutStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for DropoutStep {
    fn name(&self) -> &str {
        "Dropout Correct"
    }

    fn description(&self) -> &str {
        "Repair dropouts in the time-base-corrected file"
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        if !ctx.checks_enabled() {
            return Ok(());
        }
        let tbc = ctx.base().with_suffix(".tbc");
        if !tbc.exists() {
            return Err(StepError::file_not_found(tbc.display().to_string()));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome> {
        if !ctx.config.dry_run {
            clean_outputs(ctx.base(), OWNED_SUFFIXES)?;
        }

        let doc_tbc = ctx.base().with_suffix(".doc.tbc");
        let cmd = ToolCommand::new(&ctx.env, TOOL)
            .arg("--overcorrect")
            .arg(ctx.base().with_suffix(".tbc"))
            .arg(&doc_tbc);

        ctx.runner().run(&cmd)?;

        state.dropout = Some(DropoutOutput { doc_tbc });
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, _state: &RunState) -> StepResult<()> {
        Ok(())
    }
}
