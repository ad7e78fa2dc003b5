//! Application configuration management
//!
//! Handles loading and saving application settings including:
//! - Backend API URL
//! - Polling interval for kitchen and system health screens
//! - Default restaurant slug for public ordering

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{RestoError, Result};

/// Environment variable that overrides the configured API URL
pub const API_URL_ENV: &str = "RESTO_API_URL";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the restaurant backend
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Refresh interval for the kitchen board and system health, in seconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Restaurant slug used for public menu browsing and ordering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_slug: Option<String>,

    /// Currency symbol used when printing amounts
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_api_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_poll_interval() -> u64 {
    30
}

fn default_currency() -> String {
    "₹".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            poll_interval_secs: default_poll_interval(),
            restaurant_slug: None,
            currency: default_currency(),
        }
    }
}

impl Config {
    /// Load configuration from file, or create default if not exists
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Get the configuration directory
    pub fn config_dir() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "resto-rs", "resto-rs")
            .ok_or_else(|| RestoError::Config("Could not determine config directory".into()))?;

        Ok(project_dirs.config_dir().to_path_buf())
    }

    /// API URL with the environment override applied
    pub fn effective_api_url(&self) -> String {
        match std::env::var(API_URL_ENV) {
            Ok(url) if !url.is_empty() => url,
            _ => self.api_url.clone(),
        }
    }

    /// Set the API URL after checking it parses
    pub fn set_api_url(&mut self, value: &str) -> Result<()> {
        let parsed = url::Url::parse(value)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(RestoError::InvalidInput(format!(
                "API URL must use http or https, got '{}'",
                parsed.scheme()
            )));
        }
        self.api_url = value.trim_end_matches('/').to_string();
        Ok(())
    }

    /// Set the poll interval, rejecting zero
    pub fn set_poll_interval(&mut self, value: &str) -> Result<()> {
        let secs: u64 = value.parse().map_err(|_| {
            RestoError::InvalidInput(format!("Poll interval must be a number, got '{}'", value))
        })?;
        if secs == 0 {
            return Err(RestoError::InvalidInput(
                "Poll interval must be at least 1 second".to_string(),
            ));
        }
        self.poll_interval_secs = secs;
        Ok(())
    }

    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.poll_interval_secs.max(1))
    }

    /// Amount with the configured currency symbol, e.g. `₹250.00`
    pub fn format_amount(&self, amount: f64) -> String {
        format!("{}{:.2}", self.currency, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api_url, "http://localhost:5000");
        assert_eq!(config.poll_interval_secs, 30);
        assert_eq!(config.currency, "₹");
        assert!(config.restaurant_slug.is_none());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: Config = toml::from_str("restaurant_slug = \"spice-hub\"").unwrap();
        assert_eq!(config.poll_interval_secs, 30);
        assert_eq!(config.restaurant_slug.as_deref(), Some("spice-hub"));
    }

    #[test]
    fn test_save_and_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set_api_url("https://api.example.com/").unwrap();
        config.set_poll_interval("15").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.api_url, "https://api.example.com");
        assert_eq!(loaded.poll_interval_secs, 15);
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = Config::default();
        assert!(config.set_api_url("not a url").is_err());
        assert!(config.set_api_url("ftp://example.com").is_err());
        assert!(config.set_poll_interval("0").is_err());
        assert!(config.set_poll_interval("abc").is_err());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_format_amount_uses_currency() {
        let mut config = Config::default();
        assert_eq!(config.format_amount(250.0), "₹250.00");
        config.currency = "$".to_string();
        assert_eq!(config.format_amount(9.5), "$9.50");
    }
}
