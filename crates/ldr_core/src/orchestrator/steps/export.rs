//! Metadata export stage - converts the sidecar into plain-text exports.
//!
//! The exporter regenerates its three outputs unconditionally, so no
//! cleanup pass is needed before it runs.

use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, ExportOutput, RunState, StepOutcome};
use crate::tools::ToolCommand;

const TOOL: &str = "ld-export-metadata";

pub struct ExportStep;

impl ExportStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ExportStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for ExportStep {
    fn name(&self) -> &str {
        "Export Metadata"
    }

    fn description(&self) -> &str {
        "Export the metadata sidecar to CSV and ffmetadata"
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        if !ctx.checks_enabled() {
            return Ok(());
        }
        let sidecar = ctx.base().with_suffix(".tbc.json");
        if !sidecar.exists() {
            return Err(StepError::file_not_found(sidecar.display().to_string()));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome> {
        let vits_csv = ctx.base().with_suffix(".vits.csv");
        let vbi_csv = ctx.base().with_suffix(".vbi.csv");
        let ffmetadata = ctx.base().with_suffix(".ffmetadata");

        let cmd = ToolCommand::new(&ctx.env, TOOL)
            .arg("--vits-csv")
            .arg(&vits_csv)
            .arg("--vbi-csv")
            .arg(&vbi_csv)
            .arg("--ffmetadata")
            .arg(&ffmetadata)
            .arg(ctx.base().with_suffix(".tbc.json"));

        ctx.runner().run(&cmd)?;

        state.export = Some(ExportOutput {
            vits_csv,
            vbi_csv,
            ffmetadata,
        });
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, _state: &RunState) -> StepResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::Settings;
    use crate::logging::{LogConfig, RunLogger};
    use crate::models::RunConfig;
    use crate::orchestrator::errors::StepError;
    use crate::tools::ToolEnv;

    fn context(config: RunConfig) -> Context {
        Context::new(
            config,
            Settings::default(),
            ToolEnv::from_vars("/nonexistent", Vec::new()),
            Arc::new(RunLogger::console(LogConfig::default())),
        )
    }

    #[test]
    fn missing_sidecar_fails_precondition() {
        let ctx = context(RunConfig::new("sample.lds", "/nonexistent-out/test"));
        let err = ExportStep::new().validate_input(&ctx).unwrap_err();
        assert!(matches!(err, StepError::FileNotFound { .. }));
    }

    #[test]
    fn dry_run_records_all_three_exports() {
        let mut config = RunConfig::new("sample.lds", "/nonexistent-out/test");
        config.dry_run = true;
        let ctx = context(config);
        let mut state = RunState::default();

        ExportStep::new().execute(&ctx, &mut state).unwrap();

        let export = state.export.unwrap();
        assert!(export.vits_csv.to_string_lossy().ends_with("test.vits.csv"));
        assert!(export.vbi_csv.to_string_lossy().ends_with("test.vbi.csv"));
        assert!(export.ffmetadata.to_string_lossy().ends_with("test.ffmetadata"));
    }
}
