//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading a tip run
//! configuration from a YAML file.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::types::TipConfig;

/// Loads and provides access to a tip run configuration.
///
/// # Example
///
/// ```no_run
/// use tip_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./tip-engine.yaml").unwrap();
/// println!("Reading drawer from {}", loader.config().drawer_path.display());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: TipConfig,
}

impl ConfigLoader {
    /// Loads configuration from a YAML file.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - The file is missing or unreadable (`ConfigNotFound`)
    /// - The file contains invalid YAML or unknown fields (`ConfigParseError`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let config = Self::load_yaml::<TipConfig>(path.as_ref())?;
        debug!(config = ?config, "Loaded configuration");
        Ok(Self { config })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: TipConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &TipConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> TipConfig {
        self.config
    }
}
