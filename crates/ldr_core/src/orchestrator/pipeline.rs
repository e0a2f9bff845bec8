//! Pipeline runner that executes stages in sequence.
//!
//! Stages are strictly sequential: one external process at a time,
//! awaited to completion, and a failure in any stage aborts all later
//! stages. There is no retry, timeout or cancellation machinery.

use super::errors::{PipelineError, PipelineResult};
use super::step::PipelineStep;
use super::types::{Context, RunState, StepOutcome};

/// Pipeline that runs a fixed sequence of stages.
pub struct Pipeline {
    /// Stages to execute in order.
    steps: Vec<Box<dyn PipelineStep>>,
}

impl Pipeline {
    /// Create a new empty pipeline.
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Add a stage to the pipeline.
    pub fn add_step<S: PipelineStep + 'static>(&mut self, step: S) -> &mut Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Add a stage (builder pattern).
    pub fn with_step<S: PipelineStep + 'static>(mut self, step: S) -> Self {
        self.add_step(step);
        self
    }

    /// Run the pipeline with the given context and state.
    ///
    /// Executes each stage in order: `validate_input` -> `execute` ->
    /// `validate_output` (when execute returned `Success`). The first
    /// error aborts the run.
    pub fn run(&self, ctx: &Context, state: &mut RunState) -> PipelineResult<PipelineRunResult> {
        let mut result = PipelineRunResult {
            steps_completed: Vec::new(),
            steps_skipped: Vec::new(),
        };

        for step in &self.steps {
            let step_name = step.name();
            ctx.logger.phase(step_name);

            if let Err(e) = step.validate_input(ctx) {
                ctx.logger.error(&format!("Input validation failed: {}", e));
                return Err(PipelineError::stage_failed(step_name, e));
            }

            let outcome = step.execute(ctx, state).map_err(|e| {
                ctx.logger.error(&format!("Execution failed: {}", e));
                PipelineError::stage_failed(step_name, e)
            })?;

            match outcome {
                StepOutcome::Success => {
                    if let Err(e) = step.validate_output(ctx, state) {
                        ctx.logger.error(&format!("Output validation failed: {}", e));
                        return Err(PipelineError::stage_failed(step_name, e));
                    }

                    ctx.logger.success(&format!("{} completed", step_name));
                    result.steps_completed.push(step_name.to_string());
                }
                StepOutcome::Skipped(reason) => {
                    ctx.logger.info(&format!("{} skipped: {}", step_name, reason));
                    result.steps_skipped.push(step_name.to_string());
                }
            }
        }

        ctx.logger.success("All stages completed");
        Ok(result)
    }

    /// Get the number of stages in the pipeline.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Get stage names in order.
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineRunResult {
    /// Stages that completed successfully.
    pub steps_completed: Vec<String>,
    /// Stages that were skipped.
    pub steps_skipped: Vec<String>,
}

impl PipelineRunResult {
    /// Check if all stages completed (none skipped).
    pub fn all_completed(&self) -> bool {
        self.steps_skipped.is_empty()
    }

    /// Total number of stages that ran.
    pub fn total_steps(&self) -> usize {
        self.steps_completed.len() + self.steps_skipped.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::config::Settings;
    use crate::logging::{LogConfig, RunLogger};
    use crate::models::RunConfig;
    use crate::orchestrator::errors::{StepError, StepResult};
    use crate::tools::ToolEnv;

    fn test_context() -> Context {
        Context::new(
            RunConfig::new("sample.lds", "out/test"),
            Settings::default(),
            ToolEnv::from_vars("/nonexistent", Vec::new()),
            Arc::new(RunLogger::console(LogConfig::default())),
        )
    }

    struct CountingStep {
        name: &'static str,
        execute_count: Arc<AtomicUsize>,
        fail: bool,
    }

    impl PipelineStep for CountingStep {
        fn name(&self) -> &str {
            self.name
        }

        fn validate_input(&self, _ctx: &Context) -> StepResult<()> {
            Ok(())
        }

        fn execute(&self, _ctx: &Context, _state: &mut RunState) -> StepResult<StepOutcome> {
            self.execute_count.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(StepError::precondition_failed("induced failure"))
            } else {
                Ok(StepOutcome::Success)
            }
        }

        fn validate_output(&self, _ctx: &Context, _state: &RunState) -> StepResult<()> {
            Ok(())
        }
    }

    #[test]
    fn pipeline_builds_in_order() {
        let pipeline = Pipeline::new()
            .with_step(CountingStep {
                name: "Step1",
                execute_count: Arc::new(AtomicUsize::new(0)),
                fail: false,
            })
            .with_step(CountingStep {
                name: "Step2",
                execute_count: Arc::new(AtomicUsize::new(0)),
                fail: false,
            });

        assert_eq!(pipeline.step_count(), 2);
        assert_eq!(pipeline.step_names(), vec!["Step1", "Step2"]);
    }

    #[test]
    fn all_steps_execute_once_in_order() {
        let counts: Vec<Arc<AtomicUsize>> =
            (0..3).map(|_| Arc::new(AtomicUsize::new(0))).collect();

        let pipeline = Pipeline::new()
            .with_step(CountingStep {
                name: "A",
                execute_count: Arc::clone(&counts[0]),
                fail: false,
            })
            .with_step(CountingStep {
                name: "B",
                execute_count: Arc::clone(&counts[1]),
                fail: false,
            })
            .with_step(CountingStep {
                name: "C",
                execute_count: Arc::clone(&counts[2]),
                fail: false,
            });

        let ctx = test_context();
        let mut state = RunState::default();
        let result = pipeline.run(&ctx, &mut state).unwrap();

        assert_eq!(result.steps_completed, vec!["A", "B", "C"]);
        assert!(result.all_completed());
        for count in &counts {
            assert_eq!(count.load(Ordering::SeqCst), 1);
        }
    }

    #[test]
    fn failure_aborts_later_steps() {
        let before = Arc::new(AtomicUsize::new(0));
        let failing = Arc::new(AtomicUsize::new(0));
        let after = Arc::new(AtomicUsize::new(0));

        let pipeline = Pipeline::new()
            .with_step(CountingStep {
                name: "Before",
                execute_count: Arc::clone(&before),
                fail: false,
            })
            .with_step(CountingStep {
                name: "Failing",
                execute_count: Arc::clone(&failing),
                fail: true,
            })
            .with_step(CountingStep {
                name: "After",
                execute_count: Arc::clone(&after),
                fail: false,
            });

        let ctx = test_context();
        let mut state = RunState::default();
        let err = pipeline.run(&ctx, &mut state).unwrap_err();

        assert!(err.to_string().contains("Failing"));
        assert_eq!(before.load(Ordering::SeqCst), 1);
        assert_eq!(failing.load(Ordering::SeqCst), 1);
        assert_eq!(after.load(Ordering::SeqCst), 0);
    }

    struct SkippingStep;

    impl PipelineStep for SkippingStep {
        fn name(&self) -> &str {
            "Skipper"
        }

        fn validate_input(&self, _ctx: &Context) -> StepResult<()> {
            Ok(())
        }

        fn execute(&self, _ctx: &Context, _state: &mut RunState) -> StepResult<StepOutcome> {
            Ok(StepOutcome::Skipped("disabled".to_string()))
        }

        fn validate_output(&self, _ctx: &Context, _state: &RunState) -> StepResult<()> {
            Err(StepError::validation_failed(
                "must not validate a skipped stage",
            ))
        }
    }

    #[test]
    fn skipped_step_is_recorded_and_not_validated() {
        let pipeline = Pipeline::new().with_step(SkippingStep);

        let ctx = test_context();
        let mut state = RunState::default();
        let result = pipeline.run(&ctx, &mut state).unwrap();

        assert_eq!(result.steps_skipped, vec!["Skipper"]);
        assert!(!result.all_completed());
        assert_eq!(result.total_steps(), 1);
    }
}
