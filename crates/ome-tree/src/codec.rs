//! Document codecs
//!
//! Reads and writes whole [`TreeUnit`] documents as JSON or YAML via serde.

use crate::unit::TreeUnit;
use std::path::{Path, PathBuf};

/// Errors while decoding or encoding a tree document
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// File extension does not map to a known format
    #[error("unsupported document format: '{0}'")]
    UnsupportedFormat(String),

    /// JSON syntax or shape error
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML syntax or shape error
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO error reading or writing a document
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TreeError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Serialized form of a tree document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// `.json`
    Json,
    /// `.yaml` / `.yml`
    Yaml,
}

impl DocumentFormat {
    /// Pick a format from a path's extension
    ///
    /// # Errors
    /// Returns [`TreeError::UnsupportedFormat`] for unknown extensions
    pub fn from_path(path: &Path) -> Result<Self, TreeError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ext {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(TreeError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Decode a tree from a string
///
/// # Errors
/// Returns the underlying serde error when the text is not a tree
pub fn from_str(content: &str, format: DocumentFormat) -> Result<TreeUnit, TreeError> {
    match format {
        DocumentFormat::Json => Ok(serde_json::from_str(content)?),
        DocumentFormat::Yaml => Ok(serde_yaml::from_str(content)?),
    }
}

/// Encode a tree to a string
///
/// # Errors
/// Returns the underlying serde error
pub fn to_string(unit: &TreeUnit, format: DocumentFormat) -> Result<String, TreeError> {
    match format {
        DocumentFormat::Json => Ok(serde_json::to_string_pretty(unit)?),
        DocumentFormat::Yaml => Ok(serde_yaml::to_string(unit)?),
    }
}

/// Read a tree document from disk, format chosen by extension
///
/// # Errors
/// - [`TreeError::UnsupportedFormat`] for unknown extensions
/// - [`TreeError::Io`] if the file cannot be read
pub fn read(path: impl AsRef<Path>) -> Result<TreeUnit, TreeError> {
    let path = path.as_ref();
    let format = DocumentFormat::from_path(path)?;
    let content = std::fs::read_to_string(path).map_err(|e| TreeError::io_error(path, e))?;
    from_str(&content, format)
}

/// Write a tree document to disk, format chosen by extension
///
/// # Errors
/// - [`TreeError::UnsupportedFormat`] for unknown extensions
/// - [`TreeError::Io`] if the file cannot be written
pub fn write(unit: &TreeUnit, path: impl AsRef<Path>) -> Result<(), TreeError> {
    let path = path.as_ref();
    let format = DocumentFormat::from_path(path)?;
    let content = to_string(unit, format)?;
    std::fs::write(path, content).map_err(|e| TreeError::io_error(path, e))
}
