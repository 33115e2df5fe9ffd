//! Error types for `flowscript`.
//!
//! Stringification is fail-fast: a step the renderer cannot interpret aborts
//! the whole call and lines already appended to the writer are left in place.

use thiserror::Error;

/// Result type alias for flowscript operations.
pub type Result<T> = std::result::Result<T, FlowScriptError>;

/// Errors that can occur while loading a flow or generating a script.
#[derive(Debug, Error)]
pub enum FlowScriptError {
    /// A recorded step is missing data its renderer needs.
    #[error("Invalid {step_type} step: {reason}")]
    InvalidStep {
        /// Recorder type tag of the offending step
        step_type: String,
        /// What is missing or malformed
        reason: String,
    },

    /// Invalid identifier name (reserved word, invalid characters, etc.)
    #[error("Invalid identifier '{name}': {reason}")]
    InvalidIdentifier {
        /// The invalid identifier
        name: String,
        /// Why it's invalid
        reason: String,
    },

    /// Manifest verification failed (file missing or unreadable)
    #[error("Manifest verification failed for '{path}': {reason}")]
    ManifestError {
        /// Path to the generated script
        path: String,
        /// Why verification failed
        reason: String,
    },

    /// Hash mismatch (generated script was modified)
    #[error("Hash mismatch for '{path}': expected {expected}, got {actual}")]
    HashMismatch {
        /// Path to the generated script
        path: String,
        /// Expected hash
        expected: String,
        /// Actual hash
        actual: String,
    },

    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Flow or manifest JSON could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Options file could not be parsed
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl FlowScriptError {
    /// Create an invalid step error.
    #[must_use]
    pub fn invalid_step(step_type: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidStep {
            step_type: step_type.into(),
            reason: reason.into(),
        }
    }
}
