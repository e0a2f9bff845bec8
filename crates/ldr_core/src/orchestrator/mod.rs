//! Stage pipeline for driving the decoding toolchain.
//!
//! The harness runs a fixed sequence of stages, each bound to one
//! external tool. Every stage cleans the artifacts it owns, invokes
//! its tool through the shared environment snapshot and then checks
//! the caller's expectations against what was produced.
//!
//! # Architecture
//!
//! ```text
//! Pipeline
//!     ├── Stage: Decode
//!     ├── Stage: Process VBI
//!     ├── Stage: Export Metadata
//!     ├── Stage: Process EFM      (skipped without digital audio)
//!     ├── Stage: Dropout Correct
//!     └── Stage: Chroma Decode    (once per decoder variant)
//! ```

mod errors;
mod pipeline;
mod step;
pub mod steps;
mod types;

pub use errors::{PipelineError, PipelineResult, StepError, StepResult};
pub use pipeline::{Pipeline, PipelineRunResult};
pub use step::PipelineStep;
pub use steps::{ChromaStep, DecodeStep, DropoutStep, EfmStep, ExportStep, VbiStep};
pub use types::{
    ChromaOutput, Context, DecodeOutput, DropoutOutput, EfmOutput, ExportOutput, RunState,
    StepOutcome, VbiOutput,
};

use crate::models::RunConfig;

/// Create the standard pipeline for a run configuration.
///
/// The stage order is fixed. The EFM stage is always present and skips
/// itself when digital audio is disabled; the chroma stage appears
/// once per requested decoder variant, or once with the tool's default
/// when none was requested.
pub fn build_pipeline(config: &RunConfig) -> Pipeline {
    let mut pipeline = Pipeline::new()
        .with_step(DecodeStep::new())
        .with_step(VbiStep::new())
        .with_step(ExportStep::new())
        .with_step(EfmStep::new())
        .with_step(DropoutStep::new());

    if config.chroma_decoders.is_empty() {
        pipeline.add_step(ChromaStep::default_decoder());
    } else {
        for decoder in &config.chroma_decoders {
            pipeline.add_step(ChromaStep::with_decoder(decoder));
        }
    }

    pipeline
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_pipeline_order() {
        let config = RunConfig::new("sample.lds", "out/test");
        let pipeline = build_pipeline(&config);
        assert_eq!(
            pipeline.step_names(),
            vec![
                "Decode",
                "Process VBI",
                "Export Metadata",
                "Process EFM",
                "Dropout Correct",
                "Chroma Decode",
            ]
        );
    }

    #[test]
    fn one_chroma_stage_per_variant() {
        let mut config = RunConfig::new("sample.lds", "out/test");
        config.chroma_decoders = vec!["pal2d".to_string(), "transform3d".to_string()];
        let pipeline = build_pipeline(&config);
        assert_eq!(
            pipeline.step_names(),
            vec![
                "Decode",
                "Process VBI",
                "Export Metadata",
                "Process EFM",
                "Dropout Correct",
                "Chroma Decode (pal2d)",
                "Chroma Decode (transform3d)",
            ]
        );
    }
}
