// SPDX-License-Identifier: PMPL-1.0-or-later
//! Configuration handling for a11y-monitor

use crate::coverage::{ComponentRegistry, CountRegistry, StaticRegistry};
use crate::error::{MonitorError, Result};
use crate::history::{FileBackend, HistoryStore, DEFAULT_CAPACITY, DEFAULT_STORAGE_KEY};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Metrics history persistence
    #[serde(default)]
    pub history: HistoryConfig,

    /// Known UI components, for coverage
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Reject settings the monitor cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.history.capacity == 0 {
            return Err(MonitorError::Config("history.capacity must be at least 1".to_string()));
        }
        if self.history.key.trim().is_empty() {
            return Err(MonitorError::Config("history.key must not be empty".to_string()));
        }
        Ok(())
    }

    /// Open the history store these settings describe
    pub fn open_history(&self) -> HistoryStore {
        let backend = FileBackend::new(&self.history.storage_dir, &self.history.key);
        HistoryStore::open(Box::new(backend), self.history.capacity)
    }
}

/// History store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Directory holding the history file
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,

    /// Storage key; the history file is `<key>.json`
    #[serde(default = "default_storage_key")]
    pub key: String,

    /// Maximum number of snapshots kept
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            storage_dir: default_storage_dir(),
            key: default_storage_key(),
            capacity: default_capacity(),
        }
    }
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from(".a11y-monitor")
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

/// Component registry configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Names of every UI component the app ships
    #[serde(default)]
    pub components: Vec<String>,

    /// Explicit component count, overriding `components`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_components: Option<usize>,
}

impl RegistryConfig {
    pub fn build(&self) -> Box<dyn ComponentRegistry> {
        match self.total_components {
            Some(total) => Box::new(CountRegistry(total)),
            None => Box::new(StaticRegistry::new(self.components.iter().cloned())),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: default_log_level() }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Load configuration from a path, falling back to defaults when it is missing
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        debug!("Config file not found at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;

    debug!(?config, "Loaded configuration");
    Ok(config)
}

/// Get the default config path
pub fn default_config_path() -> PathBuf {
    PathBuf::from(".a11y-monitor/config.toml")
}

/// Write default configuration to a file
pub fn write_default_config(path: &Path) -> Result<()> {
    let config = Config::default();

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = toml::to_string_pretty(&config).map_err(|e| MonitorError::Config(e.to_string()))?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.history.capacity, 100);
        assert_eq!(config.history.key, "accessibility-metrics-history");
        assert_eq!(config.registry.build().total_components(), 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [registry]
            components = ["Navbar", "PlayerCard", "DraftBoard"]
            "#,
        )
        .unwrap();
        assert_eq!(config.history.capacity, DEFAULT_CAPACITY);
        assert_eq!(config.registry.build().total_components(), 3);
    }

    #[test]
    fn test_explicit_total_overrides_list() {
        let config: Config = toml::from_str(
            r#"
            [registry]
            components = ["Navbar"]
            total_components = 42
            "#,
        )
        .unwrap();
        assert_eq!(config.registry.build().total_components(), 42);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[history]\ncapacity = 0\n").unwrap();
        assert!(matches!(load_config(&path), Err(MonitorError::Config(_))));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = load_config(Path::new("/nonexistent/a11y-monitor.toml")).unwrap();
        assert_eq!(config.log.level, "warn");
    }

    #[test]
    fn test_write_default_config_round_trips() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");
        write_default_config(&path).unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded.history.capacity, DEFAULT_CAPACITY);
        assert_eq!(loaded.history.storage_dir, PathBuf::from(".a11y-monitor"));
    }
}
