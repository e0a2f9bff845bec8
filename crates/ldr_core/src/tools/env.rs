//! Process environment preparation.
//!
//! The toolchain runs with an immutable environment snapshot prepared
//! once, before the first stage: display-server variables are removed
//! so no tool can silently depend on an interactive display, and the
//! toolchain install root is known so every program is invoked by
//! absolute path. The harness's own process environment is never
//! mutated.

use std::env;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::models::OutputBase;

/// Environment variables that would let a tool find an interactive
/// display.
const DISPLAY_VARS: &[&str] = &["DISPLAY", "WAYLAND_DISPLAY"];

/// Immutable environment snapshot consumed by the tool runner.
#[derive(Debug, Clone)]
pub struct ToolEnv {
    /// Installation root of the decoding tools.
    tool_root: PathBuf,
    /// Filtered copy of the parent environment.
    vars: Vec<(OsString, OsString)>,
}

impl ToolEnv {
    /// Prepare the snapshot, resolving the install root from the
    /// harness's own location when no override is given.
    pub fn prepare(root_override: Option<PathBuf>) -> io::Result<Self> {
        let tool_root = match root_override {
            Some(root) => root,
            None => {
                let exe = env::current_exe()?;
                exe.parent()
                    .map(Path::to_path_buf)
                    .ok_or_else(|| {
                        io::Error::new(
                            io::ErrorKind::NotFound,
                            "harness executable has no parent directory",
                        )
                    })?
            }
        };
        Ok(Self::with_root(tool_root))
    }

    /// Build the snapshot for an explicit install root.
    pub fn with_root(tool_root: impl Into<PathBuf>) -> Self {
        Self::from_vars(tool_root, env::vars_os())
    }

    /// Build the snapshot from an explicit variable set.
    pub fn from_vars(
        tool_root: impl Into<PathBuf>,
        vars: impl IntoIterator<Item = (OsString, OsString)>,
    ) -> Self {
        let vars = vars
            .into_iter()
            .filter(|(key, _)| {
                !DISPLAY_VARS
                    .iter()
                    .any(|stripped| OsStr::new(stripped) == key.as_os_str())
            })
            .collect();

        Self {
            tool_root: tool_root.into(),
            vars,
        }
    }

    /// Installation root of the decoding tools.
    pub fn tool_root(&self) -> &Path {
        &self.tool_root
    }

    /// Absolute path of a tool under the install root.
    pub fn tool_path(&self, tool: &str) -> PathBuf {
        self.tool_root.join(tool)
    }

    /// The snapshot variables, for the runner to apply verbatim.
    pub fn vars(&self) -> &[(OsString, OsString)] {
        &self.vars
    }

    /// Look up a variable in the snapshot.
    pub fn var(&self, key: &str) -> Option<&OsStr> {
        self.vars
            .iter()
            .find(|(k, _)| OsStr::new(key) == k.as_os_str())
            .map(|(_, v)| v.as_os_str())
    }

    /// The search path value with the install root prepended, used by
    /// the decode stage so the primary decoder finds co-located
    /// helper programs.
    pub fn search_path_with_root(&self) -> OsString {
        let existing = self.var("PATH").map(|p| p.to_os_string());
        let paths = std::iter::once(self.tool_root.clone())
            .chain(existing.iter().flat_map(|path| env::split_paths(path)));
        env::join_paths(paths)
            .unwrap_or_else(|_| self.tool_root.clone().into_os_string())
    }
}

/// Create the output directory (including parents) for the basename,
/// before the first stage runs.
pub fn ensure_output_dir(base: &OutputBase) -> io::Result<()> {
    if let Some(dir) = base.dir() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn var(key: &str, value: &str) -> (OsString, OsString) {
        (OsString::from(key), OsString::from(value))
    }

    #[test]
    fn display_variables_are_stripped() {
        let env = ToolEnv::from_vars(
            "/opt/tools",
            vec![
                var("DISPLAY", ":0"),
                var("WAYLAND_DISPLAY", "wayland-0"),
                var("HOME", "/home/test"),
            ],
        );
        assert!(env.var("DISPLAY").is_none());
        assert!(env.var("WAYLAND_DISPLAY").is_none());
        assert_eq!(env.var("HOME"), Some(OsStr::new("/home/test")));
    }

    #[test]
    fn tool_paths_are_absolute_under_root() {
        let env = ToolEnv::from_vars("/opt/tools", Vec::new());
        assert_eq!(env.tool_path("ld-decode"), PathBuf::from("/opt/tools/ld-decode"));
    }

    #[test]
    fn search_path_prepends_root() {
        let env = ToolEnv::from_vars("/opt/tools", vec![var("PATH", "/usr/bin:/bin")]);
        let path = env.search_path_with_root();
        let parts: Vec<PathBuf> = std::env::split_paths(&path).collect();
        assert_eq!(parts[0], PathBuf::from("/opt/tools"));
        assert!(parts.contains(&PathBuf::from("/usr/bin")));
    }

    #[test]
    fn search_path_without_existing_path_is_root_only() {
        let env = ToolEnv::from_vars("/opt/tools", Vec::new());
        let parts: Vec<PathBuf> = std::env::split_paths(&env.search_path_with_root()).collect();
        assert_eq!(parts, vec![PathBuf::from("/opt/tools")]);
    }

    #[test]
    fn output_dir_created_with_parents() {
        let dir = TempDir::new().unwrap();
        let base = OutputBase::new(dir.path().join("a/b/test"));
        ensure_output_dir(&base).unwrap();
        assert!(dir.path().join("a/b").is_dir());

        // Idempotent.
        ensure_output_dir(&base).unwrap();
    }
}
