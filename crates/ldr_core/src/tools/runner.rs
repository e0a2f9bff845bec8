//! External command construction and execution.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::logging::RunLogger;

use super::env::ToolEnv;
use super::types::{ToolError, ToolResult};

/// One external tool invocation: program resolved to an absolute path
/// under the install root, plus its arguments and any per-stage
/// environment overrides.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    /// Tool name, for diagnostics.
    tool: String,
    /// Absolute program path.
    program: PathBuf,
    /// Argument list.
    args: Vec<OsString>,
    /// Per-stage environment overrides applied on top of the snapshot.
    env_overrides: Vec<(OsString, OsString)>,
}

impl ToolCommand {
    /// Create a command for a tool under the environment's install root.
    pub fn new(env: &ToolEnv, tool: &str) -> Self {
        Self {
            tool: tool.to_string(),
            program: env.tool_path(tool),
            args: Vec::new(),
            env_overrides: Vec::new(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append an environment override for this invocation only.
    pub fn env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.env_overrides.push((key.into(), value.into()));
        self
    }

    /// Tool name, for diagnostics.
    pub fn tool(&self) -> &str {
        &self.tool
    }

    /// The full command line for logging.
    pub fn display_line(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }
}

/// Runs tool commands against an immutable environment snapshot.
///
/// In dry-run mode the command line is printed and nothing is spawned.
pub struct ToolRunner<'a> {
    env: &'a ToolEnv,
    logger: &'a RunLogger,
    dry_run: bool,
}

impl<'a> ToolRunner<'a> {
    pub fn new(env: &'a ToolEnv, logger: &'a RunLogger, dry_run: bool) -> Self {
        Self {
            env,
            logger,
            dry_run,
        }
    }

    /// Run a command to completion.
    ///
    /// The child's standard error is merged into the same combined log
    /// as its standard output. A non-zero exit status is fatal to the
    /// run; the recent output tail is replayed first so the cause is
    /// visible.
    pub fn run(&self, cmd: &ToolCommand) -> ToolResult<()> {
        self.logger.command(&cmd.display_line());

        if self.dry_run {
            return Ok(());
        }

        tracing::debug!("Spawning {}", cmd.program.display());

        // Flush buffered output so child output lands after ours.
        self.logger.clear_tail();
        self.logger.flush();

        let mut command = Command::new(&cmd.program);
        command
            .args(&cmd.args)
            .env_clear()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        for (key, value) in self.env.vars() {
            command.env(key, value);
        }
        for (key, value) in &cmd.env_overrides {
            command.env(key, value);
        }

        let output = command
            .output()
            .map_err(|err| ToolError::spawn_failed(cmd.tool(), err))?;

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            self.logger.output_line(line, false);
        }
        for line in String::from_utf8_lossy(&output.stderr).lines() {
            self.logger.output_line(line, true);
        }

        if !output.status.success() {
            let exit_code = output.status.code().unwrap_or(-1);
            self.logger.show_tail(cmd.tool());
            return Err(ToolError::command_failed(cmd.tool(), exit_code));
        }

        Ok(())
    }
}
