//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML
//! tables. Every field has a default so a partial (or absent) file is
//! always usable; command-line flags override the loaded values.

use serde::{Deserialize, Serialize};

use crate::logging::LogLevel;

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Path-related settings.
    #[serde(default)]
    pub paths: PathSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,

    /// Toolchain location settings.
    #[serde(default)]
    pub tools: ToolSettings,
}

/// Path configuration for log output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Folder for run log files.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            logs_folder: default_logs_folder(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Minimum level for run log output.
    #[serde(default)]
    pub level: LogLevel,

    /// Also write the run log to a file under `paths.logs_folder`.
    #[serde(default)]
    pub write_log_file: bool,

    /// Number of tool-output lines replayed when a stage fails.
    #[serde(default = "default_error_tail")]
    pub error_tail: usize,

    /// Show timestamps in log output.
    #[serde(default = "default_true")]
    pub show_timestamps: bool,
}

fn default_error_tail() -> usize {
    20
}

fn default_true() -> bool {
    true
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            write_log_file: false,
            error_tail: default_error_tail(),
            show_timestamps: default_true(),
        }
    }
}

/// Toolchain location settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolSettings {
    /// Installation root of the decoding tools. When unset, the
    /// directory of the harness executable is used.
    #[serde(default)]
    pub root: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_from_empty_toml() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings.paths.logs_folder, ".logs");
        assert_eq!(settings.logging.error_tail, 20);
        assert!(settings.logging.show_timestamps);
        assert!(!settings.logging.write_log_file);
        assert!(settings.tools.root.is_none());
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [logging]
            error_tail = 50

            [tools]
            root = "/opt/ld-decode"
            "#,
        )
        .unwrap();
        assert_eq!(settings.logging.error_tail, 50);
        assert!(settings.logging.show_timestamps);
        assert_eq!(settings.tools.root.as_deref(), Some("/opt/ld-decode"));
    }

    #[test]
    fn settings_round_trip() {
        let settings = Settings::default();
        let toml_str = toml::to_string(&settings).unwrap();
        let parsed: Settings = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.paths.logs_folder, settings.paths.logs_folder);
        assert_eq!(parsed.logging.error_tail, settings.logging.error_tail);
    }
}
