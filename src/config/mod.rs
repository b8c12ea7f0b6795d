//
//  crm-client
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! Loads, saves and edits the CLI's TOML configuration, stored in a
//! platform-specific directory.
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/crm/config.toml`
//! - **macOS**: `~/Library/Application Support/crm/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\crm\config\config.toml`
//!
//! ## Example Configuration File
//!
//! ```toml
//! [api]
//! base_url = "https://api.close.com/api/v1"
//! api_key = "api_xxxxxxxx"
//! timeout_secs = 30
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use crm_client::config::Config;
//!
//! let mut config = Config::load()?;
//! config.set("api_key", "api_xxxxxxxx".to_string());
//! config.save()?;
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! The `CRM_API_KEY` and `CRM_BASE_URL` environment variables, and the
//! matching global flags, override the file at the command line.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::auth::AuthCredential;

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://api.close.com/api/v1";

/// Default request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Keys accepted by [`Config::get`] and [`Config::set`].
pub const KEYS: &[&str] = &["base_url", "api_key", "timeout_secs"];

/// Global configuration container.
///
/// All sections use `#[serde(default)]`, so a partial or empty file loads
/// with defaults for whatever is missing.
///
/// ```rust
/// use crm_client::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.api.base_url, "https://api.close.com/api/v1");
/// assert_eq!(config.api.timeout_secs, 30);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Connection settings for the CRM API.
    #[serde(default)]
    pub api: ApiConfig,
}

/// The `[api]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    /// API root; request paths are appended to it.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key, sent as the basic-auth user name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Request timeout in seconds; `0` disables it.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// Credential built from the configured API key, if any.
    pub fn credential(&self) -> Option<AuthCredential> {
        self.api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .map(AuthCredential::api_key)
    }
}

impl Config {
    /// Loads configuration from the default location.
    ///
    /// Returns [`Config::default`] when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Saves configuration to the default location, creating directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", crate::APP_NAME)
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Reads a setting by key. The `api.` prefix is optional.
    pub fn get(&self, key: &str) -> Option<String> {
        match normalize_key(key) {
            "base_url" => Some(self.api.base_url.clone()),
            "api_key" => self.api.api_key.clone(),
            "timeout_secs" => Some(self.api.timeout_secs.to_string()),
            _ => None,
        }
    }

    /// Updates a setting. Returns `false` for an unknown key or a value that
    /// does not parse.
    pub fn set(&mut self, key: &str, value: String) -> bool {
        match normalize_key(key) {
            "base_url" => {
                self.api.base_url = value;
                true
            }
            "api_key" => {
                self.api.api_key = Some(value).filter(|v| !v.is_empty());
                true
            }
            "timeout_secs" => match value.parse() {
                Ok(secs) => {
                    self.api.timeout_secs = secs;
                    true
                }
                Err(_) => false,
            },
            _ => false,
        }
    }
}

fn normalize_key(key: &str) -> &str {
    key.strip_prefix("api.").unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.api.timeout(), Some(Duration::from_secs(30)));
        assert!(config.api.credential().is_none());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        assert!(config.set("api.api_key", "api_secret".to_string()));
        assert!(config.set("base_url", "http://localhost:8080".to_string()));
        config.save_to(&path).unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded, config);
        assert_eq!(reloaded.get("api_key").as_deref(), Some("api_secret"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api]\napi_key = \"k\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.api.credential().is_some());
    }

    #[test]
    fn test_set_rejects_unknown_key_and_bad_timeout() {
        let mut config = Config::default();
        assert!(!config.set("editor", "vim".to_string()));
        assert!(!config.set("timeout_secs", "soon".to_string()));
        assert!(config.set("timeout_secs", "0".to_string()));
        assert_eq!(config.api.timeout(), None);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
