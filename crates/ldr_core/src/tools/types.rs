//! Error types for external tool invocation.

use std::io;

use thiserror::Error;

/// Errors raised while preparing for or running an external tool.
#[derive(Error, Debug)]
pub enum ToolError {
    /// An external tool exited with a non-zero status.
    #[error("{tool} failed with exit code {exit_code}")]
    CommandFailed { tool: String, exit_code: i32 },

    /// The tool could not be spawned at all.
    #[error("failed to launch {tool}: {source}")]
    SpawnFailed {
        tool: String,
        #[source]
        source: io::Error,
    },

    /// File I/O around tool execution failed.
    #[error("I/O error in {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: io::Error,
    },
}

impl ToolError {
    /// Create a command failed error.
    pub fn command_failed(tool: impl Into<String>, exit_code: i32) -> Self {
        Self::CommandFailed {
            tool: tool.into(),
            exit_code,
        }
    }

    /// Create a spawn failed error.
    pub fn spawn_failed(tool: impl Into<String>, source: io::Error) -> Self {
        Self::SpawnFailed {
            tool: tool.into(),
            source,
        }
    }

    /// Create an I/O error with operation context.
    pub fn io(operation: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }
}

/// Result type for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;
