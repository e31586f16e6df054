//! Extraction configuration.
//!
//! Loaded from a TOML file when one is provided; defaults are tuned for
//! indexing a typical repository.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::SymgraphError;

/// Tunables for the extraction pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Files larger than this are skipped with a warning record.
    pub max_file_bytes: usize,
    /// Collect doc comments into node docstrings.
    pub include_docstrings: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: 1_048_576,
            include_docstrings: true,
        }
    }
}

impl ExtractConfig {
    /// Load configuration from the given TOML path.
    pub fn load(path: &Path) -> Result<Self, SymgraphError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| SymgraphError::Config(e.to_string()))
    }

    /// Save configuration to the given path.
    pub fn save(&self, path: &Path) -> Result<(), SymgraphError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| SymgraphError::Config(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = ExtractConfig::default();
        assert_eq!(config.max_file_bytes, 1_048_576);
        assert!(config.include_docstrings);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: ExtractConfig = toml::from_str("max_file_bytes = 2048").unwrap();
        assert_eq!(config.max_file_bytes, 2048);
        assert!(config.include_docstrings);
    }
}
