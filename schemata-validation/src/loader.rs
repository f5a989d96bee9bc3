// File loading for schemas and settings

use crate::{ConfigurationError, Result};
use schemata_log::debug;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Supported file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(FileFormat::Json),
            "toml" => Some(FileFormat::Toml),
            _ => None,
        }
    }

    /// Detect the format from a path's extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                ConfigurationError::Load(format!("No file extension on {}", path.display()))
            })?;

        Self::from_extension(ext)
            .ok_or_else(|| ConfigurationError::Load(format!("Unsupported format: {}", ext)))
    }

    /// Parse a document into a JSON value
    pub fn parse(&self, content: &str) -> Result<Value> {
        match self {
            FileFormat::Json => serde_json::from_str(content)
                .map_err(|e| ConfigurationError::Parse(format!("JSON parse error: {}", e))),
            FileFormat::Toml => toml::from_str(content)
                .map_err(|e| ConfigurationError::Parse(format!("TOML parse error: {}", e))),
        }
    }
}

/// Read and parse a JSON or TOML file, picking the format by extension.
pub fn load_file(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    let format = FileFormat::from_path(path)?;
    debug!("Loading {:?} document from {}", format, path.display());
    let content = fs::read_to_string(path)?;
    format.parse(&content)
}
