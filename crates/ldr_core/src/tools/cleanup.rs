//! Stale artifact cleanup.
//!
//! Every stage deletes its own output files before running, so a
//! stage's success can only be attributed to that run and never to a
//! leftover from a previous invocation.

use std::fs;
use std::io;

use crate::models::OutputBase;

use super::types::{ToolError, ToolResult};

/// Delete each `base+suffix` file if present. Absence is not an
/// error; the operation is idempotent.
pub fn clean_outputs(base: &OutputBase, suffixes: &[&str]) -> ToolResult<()> {
    for suffix in suffixes {
        let path = base.with_suffix(suffix);
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!("Removed stale output {}", path.display());
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                return Err(ToolError::io(
                    format!("removing stale output {}", path.display()),
                    err,
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn absent_files_are_not_an_error() {
        let dir = TempDir::new().unwrap();
        let base = OutputBase::new(dir.path().join("test"));
        clean_outputs(&base, &[".tbc", ".tbc.json", ".efm"]).unwrap();
    }

    #[test]
    fn removes_present_files_and_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let base = OutputBase::new(dir.path().join("test"));

        fs::write(base.with_suffix(".tbc"), b"stale").unwrap();
        fs::write(base.with_suffix(".efm"), b"stale").unwrap();

        clean_outputs(&base, &[".tbc", ".tbc.json", ".efm"]).unwrap();
        assert!(!base.with_suffix(".tbc").exists());
        assert!(!base.with_suffix(".efm").exists());

        // Second call sees nothing to do.
        clean_outputs(&base, &[".tbc", ".tbc.json", ".efm"]).unwrap();
    }

    #[test]
    fn only_named_suffixes_are_touched() {
        let dir = TempDir::new().unwrap();
        let base = OutputBase::new(dir.path().join("test"));

        fs::write(base.with_suffix(".tbc"), b"stale").unwrap();
        fs::write(base.with_suffix(".rgb"), b"keep").unwrap();

        clean_outputs(&base, &[".tbc"]).unwrap();
        assert!(base.with_suffix(".rgb").exists());
    }
}
