//! EFM processing stage - decodes the digital audio subcarrier.
//!
//! Skipped entirely when the caller declared the source has no digital
//! audio. The EFM decoder reacts to an empty input file with a
//! blocking interactive dialog, so the harness checks the input itself
//! and fails fast before the tool is ever invoked.

use std::fs;

use crate::models::stereo_sample_pairs;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, EfmOutput, RunState, StepOutcome};
use crate::tools::{clean_outputs, ToolCommand};

const TOOL: &str = "ld-process-efm";

/// Output suffixes owned (and cleaned) by this stage.
const OWNED_SUFFIXES: &[&str] = &[".digital.pcm"];

pub struct EfmStep;

impl EfmStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EfmStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for EfmStep {
    fn name(&self) -> &str {
        "Process EFM"
    }

    fn description(&self) -> &str {
        "Decode EFM data into stereo PCM audio"
    }

    fn is_optional(&self) -> bool {
        true
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        if !ctx.checks_enabled() || !ctx.config.digital_audio {
            return Ok(());
        }

        let efm = ctx.base().with_suffix(".efm");
        let len = match fs::metadata(&efm) {
            Ok(meta) => meta.len(),
            Err(_) => {
                return Err(StepError::file_not_found(efm.display().to_string()));
            }
        };
        if len == 0 {
            return Err(StepError::precondition_failed(format!(
                "EFM input {} is empty",
                efm.display()
            )));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome> {
        if !ctx.config.digital_audio {
            return Ok(StepOutcome::Skipped(
                "digital audio processing disabled".to_string(),
            ));
        }

        if !ctx.config.dry_run {
            clean_outputs(ctx.base(), OWNED_SUFFIXES)?;
        }

        let digital_pcm = ctx.base().with_suffix(".digital.pcm");
        let cmd = ToolCommand::new(&ctx.env, TOOL)
            .arg(ctx.base().with_suffix(".efm"))
            .arg(&digital_pcm);

        ctx.runner().run(&cmd)?;

        state.efm = Some(EfmOutput { digital_pcm });
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, ctx: &Context, _state: &RunState) -> StepResult<()> {
        if !ctx.checks_enabled() {
            return Ok(());
        }
        let Some(min_samples) = ctx.config.expect.min_efm_samples else {
            return Ok(());
        };

        let digital_pcm = ctx.base().with_suffix(".digital.pcm");
        let len = fs::metadata(&digital_pcm)
            .map_err(|e| {
                StepError::io_error(format!("inspecting {}", digital_pcm.display()), e)
            })?
            .len();

        let pairs = stereo_sample_pairs(len);
        if pairs < min_samples {
            return Err(StepError::validation_failed(format!(
                "{} stereo sample pairs in {} below expected {}",
                pairs,
                digital_pcm.display(),
                min_samples
            )));
        }

        ctx.logger.validation(&format!(
            "{} stereo sample pairs (expected at least {})",
            pairs, min_samples
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tempfile::TempDir;

    use super::*;
    use crate::config::Settings;
    use crate::logging::{LogConfig, RunLogger};
    use crate::models::RunConfig;
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
    fn empty_efm_input_fails_before_tool_runs() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("test");
        fs::write(dir.path().join("test.efm"), b"").unwrap();

        let ctx = context(RunConfig::new("sample.lds", base));
        let err = EfmStep::new().validate_input(&ctx).unwrap_err();
        assert!(matches!(err, StepError::PreconditionFailed(_)));
        assert!(err.to_string().contains("test.efm"));
    }

    #[test]
    fn missing_efm_input_is_file_not_found() {
        let dir = TempDir::new().unwrap();
        let ctx = context(RunConfig::new("sample.lds", dir.path().join("test")));
        let err = EfmStep::new().validate_input(&ctx).unwrap_err();
        assert!(matches!(err, StepError::FileNotFound { .. }));
    }

    #[test]
    fn disabled_digital_audio_skips_everything() {
        let dir = TempDir::new().unwrap();
        let mut config = RunConfig::new("sample.lds", dir.path().join("test"));
        config.digital_audio = false;
        let ctx = context(config);

        // No .efm file exists, but the disabled stage must not care.
        EfmStep::new().validate_input(&ctx).unwrap();

        let mut state = RunState::default();
        let outcome = EfmStep::new().execute(&ctx, &mut state).unwrap();
        assert!(matches!(outcome, StepOutcome::Skipped(_)));
        assert!(state.efm.is_none());
    }

    #[test]
    fn sample_count_boundary() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("test");
        fs::write(dir.path().join("test.digital.pcm"), vec![0u8; 4000]).unwrap();

        // 4000 bytes -> exactly 1000 stereo sample pairs.
        let mut config = RunConfig::new("sample.lds", &base);
        config.expect.min_efm_samples = Some(1000);
        let ctx = context(config);
        EfmStep::new().validate_output(&ctx, &RunState::default()).unwrap();

        let mut config = RunConfig::new("sample.lds", &base);
        config.expect.min_efm_samples = Some(1001);
        let ctx = context(config);
        let err = EfmStep::new()
            .validate_output(&ctx, &RunState::default())
            .unwrap_err();
        assert!(err.to_string().contains("1000"));
        assert!(err.to_string().contains("1001"));
    }

    #[test]
    fn no_expectation_skips_inspection() {
        let dir = TempDir::new().unwrap();
        // No .digital.pcm on disk.
        let ctx = context(RunConfig::new("sample.lds", dir.path().join("test")));
        EfmStep::new().validate_output(&ctx, &RunState::default()).unwrap();
    }
}
