//! Configuration for mainstreet.

use crate::lookup::Backend;
use crate::verifier::{MessageTable, VerificationQuery};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Verifier configuration.
///
/// ```toml
/// backend = "smarty_streets"
/// accuracy = 5
/// locale = "en"
/// cache_capacity = 1000
///
/// [messages.en]
/// apt_missing = "Please add your apartment or suite number"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Primary lookup backend.
    #[serde(default)]
    pub backend: Backend,

    /// Default minimum accuracy for geocoder results.
    #[serde(default)]
    pub accuracy: Option<f64>,

    /// Default locale for failure messages.
    #[serde(default)]
    pub locale: Option<String>,

    /// LRU capacity for cached lookups (0 disables caching).
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Log level.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Failure message translations.
    #[serde(default, skip_serializing_if = "MessageTable::is_empty")]
    pub messages: MessageTable,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            accuracy: None,
            locale: None,
            cache_capacity: default_cache_capacity(),
            log_level: default_log_level(),
            messages: MessageTable::default(),
        }
    }
}

const fn default_cache_capacity() -> usize {
    1_000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl VerifierConfig {
    /// Default config file location, `<config dir>/mainstreet/config.toml`.
    #[must_use]
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("", "", "mainstreet")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".mainstreet/config.toml"))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn to_file(&self, path: &Path) -> crate::Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Message catalog backed by the `[messages]` table.
    #[must_use]
    pub fn catalog(&self) -> &MessageTable {
        &self.messages
    }

    /// A query for `address` carrying this config's defaults.
    #[must_use]
    pub fn query(&self, address: impl Into<String>) -> VerificationQuery {
        VerificationQuery {
            accuracy: self.accuracy,
            locale: self.locale.clone(),
            ..VerificationQuery::new(address).with_backend(self.backend)
        }
    }
}
