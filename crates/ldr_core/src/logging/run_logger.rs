//! Per-run logger with console and optional file output.
//!
//! One logger lives for the whole harness run:
//! - Writes every message to the console
//! - Optionally mirrors to a dedicated log file
//! - Captures external tool output lines into a tail buffer that is
//!   replayed when a stage fails, so the cause is visible even when
//!   the run log is long

use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use parking_lot::Mutex;

use super::types::{LogConfig, LogLevel, MessagePrefix};

/// Logger for one harness run.
pub struct RunLogger {
    /// Log file path, if file output is enabled.
    log_path: Option<PathBuf>,
    /// File writer (buffered).
    file_writer: Mutex<Option<BufWriter<File>>>,
    /// Logging configuration.
    config: LogConfig,
    /// Tail buffer of recent tool-output lines.
    tail_buffer: Mutex<VecDeque<String>>,
}

impl RunLogger {
    /// Create a console-only logger.
    pub fn console(config: LogConfig) -> Self {
        Self {
            log_path: None,
            file_writer: Mutex::new(None),
            config,
            tail_buffer: Mutex::new(VecDeque::with_capacity(100)),
        }
    }

    /// Create a logger that also writes `<run_name>.log` under `log_dir`.
    pub fn with_file(
        run_name: &str,
        log_dir: impl AsRef<Path>,
        config: LogConfig,
    ) -> io::Result<Self> {
        let log_dir = log_dir.as_ref();
        fs::create_dir_all(log_dir)?;

        let log_path = log_dir.join(format!("{}.log", sanitize_filename(run_name)));
        let file = File::create(&log_path)?;

        Ok(Self {
            log_path: Some(log_path),
            file_writer: Mutex::new(Some(BufWriter::new(file))),
            config,
            tail_buffer: Mutex::new(VecDeque::with_capacity(100)),
        })
    }

    /// Get the log file path, if file output is enabled.
    pub fn log_path(&self) -> Option<&Path> {
        self.log_path.as_deref()
    }

    /// Log a message at the specified level.
    pub fn log(&self, level: LogLevel, message: &str) {
        if level < self.config.level {
            return;
        }
        let formatted = self.format_message(message);
        self.output(&formatted);
    }

    /// Log an info message.
    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    /// Log a debug message.
    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, &MessagePrefix::Debug.format(message));
    }

    /// Log a warning message.
    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, &MessagePrefix::Warning.format(message));
    }

    /// Log an error message.
    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, &MessagePrefix::Error.format(message));
    }

    /// Log a command being executed.
    pub fn command(&self, command: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Command.format(command));
    }

    /// Log a stage phase marker.
    pub fn phase(&self, phase_name: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Phase.format(phase_name));
    }

    /// Log a success message.
    pub fn success(&self, message: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Success.format(message));
    }

    /// Log a validation result.
    pub fn validation(&self, message: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Validation.format(message));
    }

    /// Log one line of external tool output.
    ///
    /// Standard error lines are merged into the same combined log as
    /// standard output; the marker only records their origin.
    pub fn output_line(&self, line: &str, is_stderr: bool) {
        {
            let mut buffer = self.tail_buffer.lock();
            if buffer.len() >= self.config.error_tail {
                buffer.pop_front();
            }
            buffer.push_back(line.to_string());
        }

        let prefix = if is_stderr { "[stderr] " } else { "" };
        self.output(&self.format_message(&format!("{}{}", prefix, line)));
    }

    /// Replay the tail buffer, typically after a tool failure.
    pub fn show_tail(&self, header: &str) {
        let buffer = self.tail_buffer.lock();
        if buffer.is_empty() {
            return;
        }

        self.output(&self.format_message(&format!("[{}/tail]", header)));
        for line in buffer.iter() {
            self.output(&self.format_message(line));
        }
    }

    /// Clear the tail buffer (before each new tool invocation).
    pub fn clear_tail(&self) {
        self.tail_buffer.lock().clear();
    }

    /// Flush buffered output so interleaved logs stay in order.
    pub fn flush(&self) {
        if let Some(ref mut writer) = *self.file_writer.lock() {
            let _ = writer.flush();
        }
        let _ = io::stdout().flush();
    }

    /// Format a message with timestamp (if enabled).
    fn format_message(&self, message: &str) -> String {
        if self.config.show_timestamps {
            let timestamp = Local::now().format("%H:%M:%S");
            format!("[{}] {}", timestamp, message)
        } else {
            message.to_string()
        }
    }

    /// Write a formatted line to console and file.
    fn output(&self, line: &str) {
        println!("{}", line);
        if let Some(ref mut writer) = *self.file_writer.lock() {
            let _ = writeln!(writer, "{}", line);
        }
    }
}

/// Replace filesystem-hostile characters in a run name.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn console_logger_has_no_file() {
        let logger = RunLogger::console(LogConfig::default());
        assert!(logger.log_path().is_none());
        logger.info("hello");
        logger.flush();
    }

    #[test]
    fn file_logger_writes_messages() {
        let dir = TempDir::new().unwrap();
        let logger = RunLogger::with_file("test", dir.path(), LogConfig::default()).unwrap();
        logger.info("hello from the run");
        logger.flush();

        let content = fs::read_to_string(logger.log_path().unwrap()).unwrap();
        assert!(content.contains("hello from the run"));
    }

    #[test]
    fn tail_buffer_is_bounded() {
        let config = LogConfig {
            error_tail: 3,
            ..LogConfig::default()
        };
        let logger = RunLogger::console(config);
        for i in 0..10 {
            logger.output_line(&format!("line {}", i), false);
        }
        assert_eq!(logger.tail_buffer.lock().len(), 3);
        assert_eq!(logger.tail_buffer.lock().front().unwrap(), "line 7");
    }

    #[test]
    fn clear_tail_empties_buffer() {
        let logger = RunLogger::console(LogConfig::default());
        logger.output_line("stale", true);
        logger.clear_tail();
        assert!(logger.tail_buffer.lock().is_empty());
    }

    #[test]
    fn sanitize_replaces_separators() {
        assert_eq!(sanitize_filename("a/b:c"), "a_b_c");
    }

    #[test]
    fn debug_filtered_at_info_level() {
        // Just exercises the level filter; output goes to stdout.
        let logger = RunLogger::console(LogConfig::default());
        logger.debug("not shown");
        logger.log(LogLevel::Debug, "not shown either");
    }
}
