//! Application configuration management
//!
//! Handles loading and saving application settings including:
//! - Prompt endpoint URL
//! - Request timeout

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{BugpromptError, Result};

/// Endpoint used when nothing is configured
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/api/process";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// URL the form is POSTed to
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout() -> u64 {
    120
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            request_timeout_secs: default_timeout(),
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
        let project_dirs = ProjectDirs::from("com", "bugprompt", "bugprompt")
            .ok_or_else(|| BugpromptError::Config("Could not determine config directory".into()))?;

        Ok(project_dirs.config_dir().to_path_buf())
    }

    /// Log file used while the terminal UI owns the screen
    pub fn log_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("bugprompt.log"))
    }

    /// Set the endpoint after checking it parses as an http(s) URL
    pub fn set_endpoint(&mut self, endpoint: &str) -> Result<()> {
        let url = Url::parse(endpoint)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(BugpromptError::InvalidInput(format!(
                "Endpoint must be an http or https URL, got '{}'",
                url.scheme()
            )));
        }
        self.endpoint = url.to_string();
        Ok(())
    }

    /// Apply a per-run endpoint override (flag or environment)
    pub fn with_endpoint_override(mut self, endpoint: Option<&str>) -> Result<Self> {
        if let Some(endpoint) = endpoint {
            self.set_endpoint(endpoint)?;
        }
        Ok(self)
    }

    /// Set the request timeout in seconds
    pub fn set_timeout(&mut self, value: &str) -> Result<()> {
        let secs: u64 = value.trim().parse().map_err(|_| {
            BugpromptError::InvalidInput(format!(
                "Invalid timeout '{}'. Expected a whole number of seconds.",
                value
            ))
        })?;
        if secs == 0 {
            return Err(BugpromptError::InvalidInput(
                "Timeout must be at least one second".into(),
            ));
        }
        self.request_timeout_secs = secs;
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.request_timeout_secs, 120);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set_endpoint("https://prompts.example.com/api/process").unwrap();
        config.set_timeout("30").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "request_timeout_secs = 5\n").unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(loaded.request_timeout_secs, 5);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut config = Config::default();
        assert!(config.set_endpoint("localhost").is_err());
        assert!(config.set_endpoint("ftp://example.com/x").is_err());
        assert!(config.set_timeout("soon").is_err());
        assert!(config.set_timeout("0").is_err());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_endpoint_override() {
        let config = Config::default()
            .with_endpoint_override(Some("http://127.0.0.1:8080/api/process"))
            .unwrap();
        assert_eq!(config.endpoint, "http://127.0.0.1:8080/api/process");

        let untouched = Config::default().with_endpoint_override(None).unwrap();
        assert_eq!(untouched.endpoint, DEFAULT_ENDPOINT);
    }
}
