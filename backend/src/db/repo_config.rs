//! Repository configuration file support.
//!
//! This module provides utilities for reading repository configuration from
//! TOML configuration files:
//!
//! ```toml
//! [repository]
//! type = "json_file"
//!
//! [json_file]
//! path = "data/pm25_history.json"
//! pretty = true
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::factory::{history_file_from_env, RepositoryType};
use super::repository::RepositoryError;

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = "repository.toml";

/// Repository configuration from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub repository: RepositorySettings,
    #[serde(default)]
    pub json_file: JsonFileSettings,
}

/// Repository type settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type")]
    pub repo_type: String,
}

/// JSON file backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonFileSettings {
    /// History file path; empty means `HISTORY_FILE` or the default name
    #[serde(default)]
    pub path: String,
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

impl Default for JsonFileSettings {
    fn default() -> Self {
        Self {
            path: String::new(),
            pretty: default_pretty(),
        }
    }
}

fn default_pretty() -> bool {
    true
}

impl RepositoryConfig {
    /// Load repository configuration from a TOML file.
    ///
    /// # Returns
    /// * `Ok(RepositoryConfig)` if successful
    /// * `Err(RepositoryError)` if file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!("Failed to read config file: {}", e))
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse repository configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, RepositoryError> {
        toml::from_str(content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })
    }

    /// Load repository configuration from the default location.
    ///
    /// Searches for `repository.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    ///
    /// # Returns
    /// * `Ok(Some(RepositoryConfig))` if found and parsed successfully
    /// * `Ok(None)` if no config file exists in any location
    /// * `Err(RepositoryError)` if a file was found but could not be parsed
    pub fn from_default_location() -> Result<Option<Self>, RepositoryError> {
        let search_paths = [
            PathBuf::from(CONFIG_FILE_NAME),
            PathBuf::from("backend").join(CONFIG_FILE_NAME),
            PathBuf::from("..").join(CONFIG_FILE_NAME),
        ];

        for path in search_paths {
            if path.exists() {
                log::info!("loading repository config from {}", path.display());
                return Self::from_file(&path).map(Some);
            }
        }

        Ok(None)
    }

    /// Get the repository type from configuration.
    pub fn repository_type(&self) -> Result<RepositoryType, String> {
        RepositoryType::from_str(&self.repository.repo_type)
    }

    /// Resolved history file path.
    pub fn history_path(&self) -> PathBuf {
        if self.json_file.path.trim().is_empty() {
            history_file_from_env()
        } else {
            PathBuf::from(&self.json_file.path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_local_config() {
        let toml = r#"
[repository]
type = "local"
"#;

        let config = RepositoryConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.repository.repo_type, "local");
        assert_eq!(config.repository_type().unwrap(), RepositoryType::Local);
        assert!(config.json_file.pretty);
    }

    #[test]
    fn test_parse_json_file_config() {
        let toml = r#"
[repository]
type = "json_file"

[json_file]
path = "data/history.json"
pretty = false
"#;

        let config = RepositoryConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.repository_type().unwrap(), RepositoryType::JsonFile);
        assert_eq!(config.history_path(), PathBuf::from("data/history.json"));
        assert!(!config.json_file.pretty);
    }

    #[test]
    fn test_invalid_type_is_reported() {
        let toml = r#"
[repository]
type = "postgres"
"#;

        let config = RepositoryConfig::from_toml_str(toml).unwrap();
        assert!(config.repository_type().is_err());
    }

    #[test]
    fn test_malformed_toml_is_configuration_error() {
        let err = RepositoryConfig::from_toml_str("[repository\ntype=").unwrap_err();
        assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
    }
}
