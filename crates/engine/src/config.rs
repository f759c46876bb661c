//! Server configuration via `replikit.toml`
//!
//! On first start a default `replikit.toml` is written next to the dataset.
//! To change settings, edit the file and restart.

use replikit_core::Limits;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{EngineError, Result};

/// Config file name placed in the working directory
pub const CONFIG_FILE_NAME: &str = "replikit.toml";

/// Collection used when an update item does not name one
pub const DEFAULT_COLLECTION: &str = "_default._default";

/// Server configuration loaded from `replikit.toml`
///
/// # Example
///
/// ```toml
/// dataset_dir = "datasets/travel"
/// default_collection = "_default._default"
/// collections = ["_default._default", "inventory.airline"]
/// log_level = "info"
///
/// [limits]
/// max_array_index = 1000000
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// Dataset directory; blobs are read from `<dataset_dir>/blobs/<name>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_dir: Option<PathBuf>,
    /// Collection used when an update item names none
    #[serde(default = "default_collection")]
    pub default_collection: String,
    /// Collections created at startup, in addition to the default one
    #[serde(default)]
    pub collections: Vec<String>,
    /// Log filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Engine limits
    #[serde(default)]
    pub limits: Limits,
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            dataset_dir: None,
            default_collection: default_collection(),
            collections: Vec::new(),
            log_level: default_log_level(),
            limits: Limits::default(),
        }
    }
}

impl ServerConfig {
    /// Every collection to create at startup, default collection first
    pub fn all_collections(&self) -> Vec<String> {
        let mut all = vec![self.default_collection.clone()];
        for name in &self.collections {
            if !all.contains(name) {
                all.push(name.clone());
            }
        }
        all
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# replikit test server configuration
#
# Dataset directory. Blob names in updatedBlobs are loaded from
# <dataset_dir>/blobs/<name>. Leave unset to reject blob updates.
# dataset_dir = "datasets/names"

# Collection used when an update item does not name one
default_collection = "_default._default"

# Additional collections to create at startup
collections = []

# Log filter used when RUST_LOG is not set
log_level = "info"

[limits]
# Maximum number of segments in a key path
max_path_segments = 256
# Maximum array index reachable by auto-extension
max_array_index = 1000000
# Maximum nesting depth of decoded documents
max_nesting_depth = 128
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            EngineError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: ServerConfig = toml::from_str(&content).map_err(|e| {
            EngineError::Config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.default_collection.is_empty() {
            return Err(EngineError::Config(
                "default_collection must not be empty".to_string(),
            ));
        }
        if self.collections.iter().any(String::is_empty) {
            return Err(EngineError::Config(
                "collection names must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                EngineError::Config(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| EngineError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            EngineError::Config(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
