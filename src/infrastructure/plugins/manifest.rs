//! Unit manifest definition

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::application::errors::DiscoveryError;

/// Metadata file that makes a compiled-in plugin visible to discovery
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct UnitManifest {
    /// Constructor symbol; defaults to the file stem
    pub symbol: Option<String>,

    /// Disabled units are skipped without being a failure
    pub enabled: bool,
}

impl Default for UnitManifest {
    fn default() -> Self {
        Self {
            symbol: None,
            enabled: true,
        }
    }
}

impl UnitManifest {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DiscoveryError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| DiscoveryError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&content).map_err(|reason| DiscoveryError::Manifest {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// An empty document is a manifest with every default
    pub fn parse(content: &str) -> Result<Self, String> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    }

    /// Symbol to resolve, falling back to the unit's file stem
    pub fn symbol_or<'a>(&'a self, stem: &'a str) -> &'a str {
        self.symbol.as_deref().filter(|s| !s.is_empty()).unwrap_or(stem)
    }
}
