//! Application configuration management.
//!
//! This module handles loading the application configuration:
//! where durable storage lives, how long the simulated fetch takes and which
//! tab opens first.
//!
//! Configuration is stored at `~/.config/assetdeck/config.json`. The
//! `ASSETDECK_DATA_DIR` environment variable overrides `data_dir`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::source::DEFAULT_FETCH_DELAY;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "assetdeck";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the storage directory
pub const DATA_DIR_ENV: &str = "ASSETDECK_DATA_DIR";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub data_dir: Option<PathBuf>,
    pub fetch_delay_ms: Option<u64>,
    /// Cache name of the tab shown at startup, e.g. "auditLogs"
    pub start_tab: Option<String>,
}

impl Config {
    /// Load, falling back to defaults when the file is unreadable or invalid.
    ///
    /// The load error is handed back rather than logged so the caller can
    /// report it once logging is up.
    pub fn load_or_default() -> (Self, Option<anyhow::Error>) {
        match Self::config_path() {
            Ok(path) => Self::load_from_or_default(&path),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    pub fn load_from_or_default(path: &Path) -> (Self, Option<anyhow::Error>) {
        match Self::load_from(path) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&contents).with_context(|| format!("Invalid config in {}", path.display()))
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory for durable storage and the log file.
    pub fn data_dir(&self) -> Result<PathBuf> {
        self.resolve_data_dir(std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
    }

    fn resolve_data_dir(&self, env_override: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(dir) = env_override.filter(|d| !d.as_os_str().is_empty()) {
            return Ok(dir);
        }
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    pub fn fetch_delay(&self) -> Duration {
        self.fetch_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_FETCH_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.fetch_delay(), DEFAULT_FETCH_DELAY);
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"fetch_delay_ms": 50}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.fetch_delay(), Duration::from_millis(50));
        assert!(config.start_tab.is_none());
    }

    #[test]
    fn test_invalid_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_invalid_file_falls_back_and_keeps_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"fetch_delay_ms": "soon"}"#).unwrap();

        let (config, error) = Config::load_from_or_default(&path);
        assert_eq!(config, Config::default());
        let error = error.expect("load error should be kept");
        assert!(format!("{error:#}").contains("Invalid config"));

        let (_, error) = Config::load_from_or_default(&dir.path().join("absent.json"));
        assert!(error.is_none());
    }

    #[test]
    fn test_full_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"data_dir": "/srv/assetdeck", "fetch_delay_ms": 10, "start_tab": "auditLogs"}"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(
            config,
            Config {
                data_dir: Some(PathBuf::from("/srv/assetdeck")),
                fetch_delay_ms: Some(10),
                start_tab: Some("auditLogs".to_string()),
            }
        );
    }

    #[test]
    fn test_data_dir_precedence() {
        let config = Config {
            data_dir: Some(PathBuf::from("/from/config")),
            ..Default::default()
        };
        assert_eq!(
            config.resolve_data_dir(Some(PathBuf::from("/from/env"))).unwrap(),
            PathBuf::from("/from/env")
        );
        assert_eq!(
            config.resolve_data_dir(Some(PathBuf::new())).unwrap(),
            PathBuf::from("/from/config")
        );
        assert_eq!(config.resolve_data_dir(None).unwrap(), PathBuf::from("/from/config"));
    }
}
