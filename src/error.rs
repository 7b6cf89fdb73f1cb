//! Error types for trait composition and document loading.
//!
//! Schema-authoring mistakes are reported as [`crate::Diagnostic`]s, not errors.
//! The types here cover caller bugs and unreadable input.

use std::path::PathBuf;
use thiserror::Error;

/// Invalid arguments passed to a trait operation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TraitError {
    #[error("unknown model '{name}'")]
    UnknownModel { name: String },

    #[error("model '{model}' has no property '{property}'")]
    UnknownProperty { model: String, property: String },

    #[error("unknown {kind} '{name}'")]
    UnknownTarget { kind: &'static str, name: String },

    #[error("invalid target for {operation}: expected {expected}, got {actual}")]
    InvalidTarget {
        operation: &'static str,
        expected: &'static str,
        actual: String,
    },
}

/// Errors while loading or elaborating a trait document.
#[derive(Debug, Error)]
pub enum LoadError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Document errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("duplicate {kind} '{name}'")]
    Duplicate { kind: &'static str, name: String },

    #[error("step {index} ({op}): {source}")]
    Step {
        index: usize,
        op: &'static str,
        #[source]
        source: TraitError,
    },
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            _ => 2,
        }
    }
}
