//! Error types for the stage pipeline.
//!
//! Four failure classes share one fate: a tool exiting non-zero, a
//! missing or empty input artifact, a produced artifact failing a
//! declared expectation, and a structurally malformed metadata
//! document all abort the run with a single descriptive diagnostic.

use std::io;

use thiserror::Error;

use crate::metadata::MetadataError;
use crate::tools::ToolError;

/// Top-level pipeline error with stage context.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A stage failed during execution.
    #[error("stage '{stage}' failed: {source}")]
    StageFailed {
        stage: String,
        #[source]
        source: StepError,
    },

    /// Failed to set up the run (output directory, environment).
    #[error("run setup failed: {message}")]
    SetupFailed { message: String },
}

impl PipelineError {
    /// Create a stage failed error.
    pub fn stage_failed(stage: impl Into<String>, source: StepError) -> Self {
        Self::StageFailed {
            stage: stage.into(),
            source,
        }
    }

    /// Create a setup failed error.
    pub fn setup_failed(message: impl Into<String>) -> Self {
        Self::SetupFailed {
            message: message.into(),
        }
    }
}

/// Error from a pipeline stage.
#[derive(Error, Debug)]
pub enum StepError {
    /// External tool invocation failed.
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// An expected input artifact is missing or unusable.
    #[error("precondition not met: {0}")]
    PreconditionFailed(String),

    /// A required file was not found.
    #[error("required file not found: {path}")]
    FileNotFound { path: String },

    /// A produced artifact does not meet a declared expectation.
    #[error("validation failed: {0}")]
    ValidationFailed(String),

    /// The metadata document is malformed or unreadable.
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    /// File I/O error.
    #[error("I/O error in {operation}: {source}")]
    IoError {
        operation: String,
        #[source]
        source: io::Error,
    },
}

impl StepError {
    /// Create a precondition failed error.
    pub fn precondition_failed(message: impl Into<String>) -> Self {
        Self::PreconditionFailed(message.into())
    }

    /// Create a file not found error.
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a validation failed error.
    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::ValidationFailed(message.into())
    }

    /// Create an I/O error with context.
    pub fn io_error(operation: impl Into<String>, source: io::Error) -> Self {
        Self::IoError {
            operation: operation.into(),
            source,
        }
    }
}

/// Result type for stage operations.
pub type StepResult<T> = Result<T, StepError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
