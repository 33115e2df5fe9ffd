//! Manifests for generated scripts.
//!
//! A script written with a manifest gets a sibling `<file>.manifest.json`
//! holding a Blake3 hash of its contents and how it was produced.
//! [`verify`] detects scripts edited by hand after generation.

use crate::error::{FlowScriptError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How a script was generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationMetadata {
    /// Tool that generated the script
    pub tool: String,
    /// Tool version
    pub version: String,
    /// Blake3 hash of the input flow JSON
    pub input_hash: String,
    /// RFC 3339 timestamp
    pub timestamp: String,
    /// Command to regenerate
    pub regenerate_cmd: String,
}

impl GenerationMetadata {
    /// Metadata for a script generated now from `flow_json`.
    #[must_use]
    pub fn for_input(flow_json: &str, regenerate_cmd: impl Into<String>) -> Self {
        Self {
            tool: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            input_hash: hash_file_contents(flow_json),
            timestamp: chrono::Utc::now().to_rfc3339(),
            regenerate_cmd: regenerate_cmd.into(),
        }
    }
}

/// Manifest stored alongside a generated script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileManifest {
    /// Version of manifest format
    pub manifest_version: u32,
    /// File name of the generated script
    pub output_path: String,
    /// Blake3 hash of the script contents
    pub output_hash: String,
    /// Generation metadata
    pub generation: GenerationMetadata,
}

impl FileManifest {
    /// Current manifest format version.
    pub const VERSION: u32 = 1;

    /// Create a new manifest.
    #[must_use]
    pub fn new(
        output_path: impl Into<String>,
        output_hash: impl Into<String>,
        generation: GenerationMetadata,
    ) -> Self {
        Self {
            manifest_version: Self::VERSION,
            output_path: output_path.into(),
            output_hash: output_hash.into(),
            generation,
        }
    }

    /// Manifest path for a generated script.
    #[must_use]
    pub fn manifest_path(generated_path: &Path) -> PathBuf {
        let mut filename = generated_path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        filename.push_str(".manifest.json");
        generated_path.with_file_name(filename)
    }

    /// Write manifest to file.
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Read manifest from file.
    pub fn read(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Blake3 hash of `contents`, hex encoded.
#[must_use]
pub fn hash_file_contents(contents: &str) -> String {
    blake3::hash(contents.as_bytes()).to_hex().to_string()
}

/// Verify a generated script matches its manifest.
///
/// # Errors
///
/// `ManifestError` when the manifest is missing or unreadable,
/// `HashMismatch` when the script was modified.
pub fn verify(generated_path: &Path) -> Result<FileManifest> {
    let manifest_path = FileManifest::manifest_path(generated_path);

    let manifest = FileManifest::read(&manifest_path).map_err(|e| FlowScriptError::ManifestError {
        path: generated_path.display().to_string(),
        reason: format!("cannot read {}: {e}", manifest_path.display()),
    })?;

    let contents = std::fs::read_to_string(generated_path)?;
    let actual = hash_file_contents(&contents);
    if actual != manifest.output_hash {
        return Err(FlowScriptError::HashMismatch {
            path: generated_path.display().to_string(),
            expected: manifest.output_hash,
            actual,
        });
    }

    tracing::debug!(path = %generated_path.display(), "manifest verified");
    Ok(manifest)
}

/// Write a generated script and its manifest.
pub fn write_with_manifest(
    path: &Path,
    contents: &str,
    metadata: GenerationMetadata,
) -> Result<PathBuf> {
    std::fs::write(path, contents)?;

    let manifest = FileManifest::new(
        path.file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default(),
        hash_file_contents(contents),
        metadata,
    );
    let manifest_path = FileManifest::manifest_path(path);
    manifest.write(&manifest_path)?;
    Ok(manifest_path)
}
