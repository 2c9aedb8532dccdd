//! Repository factory for dependency injection.
//!
//! This module provides utilities for creating and configuring history
//! repository instances based on runtime configuration.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use log::info;

use super::repo_config::RepositoryConfig;
#[cfg(feature = "json-file-repo")]
use super::repositories::JsonFileRepository;
use super::repositories::LocalRepository;
use super::repository::{HistoryRepository, RepositoryError, RepositoryResult};

/// Environment variable overriding the history file location.
pub const HISTORY_FILE_ENV: &str = "HISTORY_FILE";
/// Environment variable selecting the repository backend.
pub const REPOSITORY_TYPE_ENV: &str = "REPOSITORY_TYPE";

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// JSON array persisted on disk
    JsonFile,
    /// In-memory local repository
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Parse repository type from string.
    ///
    /// # Arguments
    /// * `s` - String representation ("json_file", "json", "file", "local")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json_file" | "json-file" | "json" | "file" => Ok(Self::JsonFile),
            "local" | "memory" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// Get repository type from environment variable.
    ///
    /// Reads `REPOSITORY_TYPE`. Defaults to the JSON file backend when it is
    /// compiled in, otherwise Local.
    pub fn from_env() -> Self {
        if let Ok(val) = std::env::var(REPOSITORY_TYPE_ENV) {
            if let Ok(repo_type) = val.parse() {
                return repo_type;
            }
            log::warn!("ignoring invalid {}={}", REPOSITORY_TYPE_ENV, val);
        }
        Self::default_type()
    }

    fn default_type() -> Self {
        if cfg!(feature = "json-file-repo") {
            Self::JsonFile
        } else {
            Self::Local
        }
    }
}

/// History file path from `HISTORY_FILE`, or the default file name.
pub fn history_file_from_env() -> PathBuf {
    std::env::var(HISTORY_FILE_ENV)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(super::DEFAULT_HISTORY_FILE))
}

/// Repository factory for creating repository instances.
///
/// # Example
/// ```ignore
/// use pm25_sim::db::{RepositoryFactory, RepositoryType};
///
/// let file_repo = RepositoryFactory::create(RepositoryType::JsonFile, Some("history.json".as_ref()))?;
/// let local_repo = RepositoryFactory::create_local();
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository instance based on type.
    ///
    /// # Arguments
    /// * `repo_type` - Type of repository to create
    /// * `history_file` - File path for the JSON backend (defaults to `HISTORY_FILE`)
    pub fn create(
        repo_type: RepositoryType,
        history_file: Option<&Path>,
    ) -> RepositoryResult<Arc<dyn HistoryRepository>> {
        match repo_type {
            RepositoryType::JsonFile => {
                let path = history_file
                    .map(Path::to_path_buf)
                    .unwrap_or_else(history_file_from_env);
                Self::create_json_file(path, true)
            }
            RepositoryType::Local => Ok(Self::create_local()),
        }
    }

    /// Create a JSON file repository.
    #[cfg(feature = "json-file-repo")]
    pub fn create_json_file(
        path: PathBuf,
        pretty: bool,
    ) -> RepositoryResult<Arc<dyn HistoryRepository>> {
        info!("using JSON history file {}", path.display());
        Ok(Arc::new(JsonFileRepository::new(path).with_pretty(pretty)))
    }

    /// Create a JSON file repository when the feature is disabled.
    #[cfg(not(feature = "json-file-repo"))]
    pub fn create_json_file(
        _path: PathBuf,
        _pretty: bool,
    ) -> RepositoryResult<Arc<dyn HistoryRepository>> {
        Err(RepositoryError::configuration(
            "JSON file repository feature not enabled",
        ))
    }

    /// Create an in-memory local repository.
    pub fn create_local() -> Arc<dyn HistoryRepository> {
        info!("using in-memory history");
        Arc::new(LocalRepository::new())
    }

    /// Create repository from environment configuration.
    ///
    /// Reads `REPOSITORY_TYPE` and `HISTORY_FILE`.
    pub fn from_env() -> RepositoryResult<Arc<dyn HistoryRepository>> {
        Self::create(RepositoryType::from_env(), None)
    }

    /// Create repository from a TOML configuration file.
    pub fn from_config_file<P: AsRef<Path>>(
        config_path: P,
    ) -> RepositoryResult<Arc<dyn HistoryRepository>> {
        let config = RepositoryConfig::from_file(config_path)?;
        Self::from_repository_config(&config)
    }

    /// Create repository from the default configuration file location,
    /// falling back to the environment when no file is found.
    pub fn from_default_config() -> RepositoryResult<Arc<dyn HistoryRepository>> {
        match RepositoryConfig::from_default_location() {
            Ok(Some(config)) => Self::from_repository_config(&config),
            Ok(None) => Self::from_env(),
            Err(e) => Err(e),
        }
    }

    /// Create repository from a RepositoryConfig instance.
    pub fn from_repository_config(
        config: &RepositoryConfig,
    ) -> RepositoryResult<Arc<dyn HistoryRepository>> {
        let repo_type = config.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;

        match repo_type {
            RepositoryType::JsonFile => {
                Self::create_json_file(config.history_path(), config.json_file.pretty)
            }
            RepositoryType::Local => Ok(Self::create_local()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_type_aliases() {
        assert_eq!(
            RepositoryType::from_str("JSON_FILE").unwrap(),
            RepositoryType::JsonFile
        );
        assert_eq!(RepositoryType::from_str("file").unwrap(), RepositoryType::JsonFile);
        assert_eq!(RepositoryType::from_str("memory").unwrap(), RepositoryType::Local);
    }

    #[test]
    fn test_create_local_backend_name() {
        let repo = RepositoryFactory::create(RepositoryType::Local, None).unwrap();
        assert_eq!(repo.backend_name(), "local");
    }

    #[cfg(feature = "json-file-repo")]
    #[test]
    fn test_create_json_file_backend_name() {
        let path = Path::new("target/factory-test-history.json");
        let repo = RepositoryFactory::create(RepositoryType::JsonFile, Some(path)).unwrap();
        assert_eq!(repo.backend_name(), "json_file");
    }
}
