//! Source registry configuration
//!
//! The registry is the list of HTTP sources one run will attempt. It is
//! supplied externally as JSON (a file on disk or an inline document) and
//! is read-only for the duration of a run. A registry that cannot be
//! loaded or fails validation is a fatal [`IngestError::Config`].

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use tracing::info;

use crate::error::{IngestError, Result};

/// One configured HTTP source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Unique, non-empty source name; becomes the raw-zone path prefix
    pub name: String,
    /// GET endpoint URL
    pub url: String,
    /// Optional bearer token sent as `Authorization: Bearer <key>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Query parameters appended to the request
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub params: HashMap<String, String>,
}

/// The full set of configured sources for a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRegistry {
    pub sources: Vec<SourceConfig>,
}

impl SourceRegistry {
    /// Parse and validate a registry from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let registry: SourceRegistry = serde_json::from_str(json)
            .map_err(|e| IngestError::Config(format!("invalid source registry JSON: {}", e)))?;
        registry.validate()?;
        Ok(registry)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for source in &self.sources {
            if source.name.trim().is_empty() {
                return Err(IngestError::Config(
                    "source name must be non-empty".to_string(),
                ));
            }
            if source.url.trim().is_empty() {
                return Err(IngestError::Config(format!(
                    "source '{}' has an empty url",
                    source.name
                )));
            }
            if !seen.insert(source.name.as_str()) {
                return Err(IngestError::Config(format!(
                    "duplicate source name '{}'",
                    source.name
                )));
            }
        }
        Ok(())
    }

    /// Sources this run should attempt, optionally narrowed to one name.
    ///
    /// An unknown filter name yields an empty selection, not an error.
    pub fn select(&self, filter: Option<&str>) -> Vec<SourceConfig> {
        match filter {
            Some(name) => self
                .sources
                .iter()
                .filter(|s| s.name == name)
                .cloned()
                .collect(),
            None => self.sources.clone(),
        }
    }
}

/// Where the source registry comes from
#[derive(Debug, Clone)]
pub enum SourceProvider {
    /// JSON file on disk
    File(PathBuf),
    /// Inline JSON document (tests, env-injected config)
    Inline(String),
}

impl SourceProvider {
    /// Load and validate the registry. Any failure here is fatal.
    pub fn load(&self) -> Result<SourceRegistry> {
        let json = match self {
            SourceProvider::File(path) => std::fs::read_to_string(path).map_err(|e| {
                IngestError::Config(format!(
                    "failed to read source registry '{}': {}",
                    path.display(),
                    e
                ))
            })?,
            SourceProvider::Inline(json) => json.clone(),
        };

        let registry = SourceRegistry::from_json(&json)?;
        info!(sources = registry.sources.len(), "Loaded source registry");
        Ok(registry)
    }
}
