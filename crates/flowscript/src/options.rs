//! Script generation options.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options shared by every renderer.
///
/// Can be loaded from YAML; missing keys take their defaults:
///
/// ```yaml
/// indent: "    "
/// timeout_ms: 10000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptOptions {
    /// One indentation level
    pub indent: String,
    /// Default Puppeteer timeout for every page operation
    pub timeout_ms: u64,
}

impl Default for ScriptOptions {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            timeout_ms: 5000,
        }
    }
}

impl ScriptOptions {
    /// Create default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set indentation
    #[must_use]
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Set default timeout
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Parse options from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Load options from a YAML file.
    pub fn from_yaml_path(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }
}
