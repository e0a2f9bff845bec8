//! Pipeline stage trait definition.

use super::errors::StepResult;
use super::types::{Context, RunState, StepOutcome};

/// Trait for pipeline stages.
///
/// The pipeline runner calls these methods in order:
///
/// 1. `validate_input` - check preconditions before execution
/// 2. `execute` - clean owned artifacts, then run the external tool
/// 3. `validate_output` - verify produced artifacts against the
///    caller's expectations
///
/// Preconditions and output validation are suppressed in dry-run mode
/// (nothing is produced to inspect); command construction still runs.
pub trait PipelineStep {
    /// Stage name, for logging and error context.
    fn name(&self) -> &str;

    /// Validate inputs before execution.
    ///
    /// Checks that the artifacts this stage consumes exist and are
    /// usable. Runs before any external tool is spawned, so a failed
    /// precondition never reaches the tool.
    fn validate_input(&self, ctx: &Context) -> StepResult<()>;

    /// Execute the stage's work.
    ///
    /// Deletes the stage's owned output suffixes, invokes the external
    /// tool and records produced artifacts in `state`. Returns
    /// `StepOutcome::Skipped` when the stage is disabled by
    /// configuration.
    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome>;

    /// Validate outputs after execution.
    ///
    /// Called only after `execute` returns `Success`. Inspects
    /// produced artifacts against the declared expectations; a failure
    /// aborts the run exactly like a tool failure.
    fn validate_output(&self, ctx: &Context, state: &RunState) -> StepResult<()>;

    /// Whether this stage can be skipped by configuration.
    fn is_optional(&self) -> bool {
        false
    }

    /// Human-readable description of what this stage does.
    fn description(&self) -> &str {
        self.name()
    }
}
