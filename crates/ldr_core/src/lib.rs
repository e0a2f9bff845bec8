//! ldr_core - backend logic for ld-regress
//!
//! This crate contains all harness logic with zero CLI dependencies:
//! the stage pipeline, external tool invocation, artifact cleanup and
//! the output validators. The `ldr_cli` crate provides the binary.

pub mod config;
pub mod logging;
pub mod metadata;
pub mod models;
pub mod orchestrator;
pub mod tools;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_returns_value() {
        assert!(!version().is_empty());
    }
}
