//! Explorer Configuration
//!
//! Defaults, optionally overlaid by a YAML file and then by environment
//! variables (a `.env` file is honoured).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::graphql::launches::DEFAULT_PAGE_SIZE;

pub const CHARACTERS_ENDPOINT: &str = "https://rickandmortyapi.com/graphql";
pub const LAUNCHES_ENDPOINT: &str = "https://spacex-production.up.railway.app/";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Local storage file for this profile.
    pub storage_path: PathBuf,
    pub characters_endpoint: String,
    pub launches_endpoint: String,
    pub launches_page_size: u32,
    pub request_timeout_secs: u64,
    /// Where the interactive client writes its rolling log files.
    pub log_dir: PathBuf,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from("explorer_storage.json"),
            characters_endpoint: CHARACTERS_ENDPOINT.to_string(),
            launches_endpoint: LAUNCHES_ENDPOINT.to_string(),
            launches_page_size: DEFAULT_PAGE_SIZE,
            request_timeout_secs: 15,
            log_dir: PathBuf::from("logs"),
        }
    }
}

impl ExplorerConfig {
    /// Full layering: `.env`, then `EXPLORER_CONFIG` (YAML), then env vars.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        let mut config = match std::env::var("EXPLORER_CONFIG") {
            Ok(path) if !path.trim().is_empty() => Self::from_yaml_file(path.trim())?,
            _ => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overlays values from an environment lookup. Unparseable numbers keep
    /// the current value.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(path) = get("EXPLORER_STORAGE") {
            self.storage_path = PathBuf::from(path);
        }
        if let Some(url) = get("EXPLORER_CHARACTERS_ENDPOINT") {
            self.characters_endpoint = url;
        }
        if let Some(url) = get("EXPLORER_LAUNCHES_ENDPOINT") {
            self.launches_endpoint = url;
        }
        if let Some(raw) = get("EXPLORER_LAUNCHES_PAGE_SIZE") {
            match raw.parse::<u32>() {
                Ok(size) if size > 0 => self.launches_page_size = size,
                _ => warn!("Ignoring invalid EXPLORER_LAUNCHES_PAGE_SIZE={:?}", raw),
            }
        }
        if let Some(raw) = get("EXPLORER_REQUEST_TIMEOUT_SECS") {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => self.request_timeout_secs = secs,
                _ => warn!("Ignoring invalid EXPLORER_REQUEST_TIMEOUT_SECS={:?}", raw),
            }
        }
        if let Some(dir) = get("EXPLORER_LOG_DIR") {
            self.log_dir = PathBuf::from(dir);
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
