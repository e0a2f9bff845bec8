//! VBI processing stage - decodes vertical-blanking-interval data.
//!
//! The analyzer rewrites the JSON sidecar in place with per-field VBI
//! and quality data, keeping a backup of the prior sidecar. This is
//! also where the caller's metadata expectations are checked: the
//! median bPSNR gate and the VBI triple search.

use crate::metadata::{find_vbi_triple, median_bpsnr, MetadataDocument};
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, RunState, StepOutcome, VbiOutput};
use crate::tools::{clean_outputs, ToolCommand};

const TOOL: &str = "ld-process-vbi";

/// Output suffixes owned (and cleaned) by this stage.
const OWNED_SUFFIXES: &[&str] = &[".tbc.json.bup"];

pub struct VbiStep;

impl VbiStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for VbiStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for VbiStep {
    fn name(&self) -> &str {
        "Process VBI"
    }

    fn description(&self) -> &str {
        "Decode VBI data into the metadata sidecar"
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

        let cmd = ToolCommand::new(&ctx.env, TOOL).arg(ctx.base().with_suffix(".tbc"));
        ctx.runner().run(&cmd)?;

        state.vbi = Some(VbiOutput {
            backup: ctx.base().with_suffix(".tbc.json.bup"),
        });
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, ctx: &Context, _state: &RunState) -> StepResult<()> {
        if !ctx.checks_enabled() || !ctx.config.expect.wants_metadata() {
            return Ok(());
        }

        let sidecar = ctx.base().with_suffix(".tbc.json");
        let doc = MetadataDocument::load(&sidecar)?;

        if let Some(min_bpsnr) = ctx.config.expect.min_bpsnr {
            match median_bpsnr(&doc) {
                Some(median) if median >= min_bpsnr => {
                    ctx.logger.validation(&format!(
                        "median bPSNR {:.2} dB (expected at least {:.2} dB)",
                        median, min_bpsnr
                    ));
                }
                Some(median) => {
                    return Err(StepError::validation_failed(format!(
                        "median bPSNR {:.2} dB below expected {:.2} dB",
                        median, min_bpsnr
                    )));
                }
                None => {
                    return Err(StepError::validation_failed(format!(
                        "no field in {} carries a bPSNR metric",
                        sidecar.display()
                    )));
                }
            }
        }

        if let Some(triple) = ctx.config.expect.vbi {
            if find_vbi_triple(&doc, triple) {
                ctx.logger
                    .validation(&format!("found field with VBI data {:?}", triple));
            } else {
                return Err(StepError::validation_failed(format!(
                    "no field with VBI data {:?} in {}",
                    triple,
                    sidecar.display()
                )));
            }
        }

        Ok(())
    }
}
