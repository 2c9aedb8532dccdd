//! Storage module for the calculation history.
//!
//! This module provides abstractions for history persistence via the
//! Repository pattern, allowing different storage backends to be swapped
//! easily.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (REST API, simulation service)       │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs)                            │
//! │  - record_run / list_history / clear_history            │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Trait (repository/) - Abstract Interface    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴──────────────┐
//!     │                              │
//! ┌───▼──────────────┐   ┌───────────▼──────┐
//! │ JsonFile         │   │ Local            │
//! │ (JSON array file)│   │ (in-memory)      │
//! └──────────────────┘   └──────────────────┘
//! ```
//!
//! # Recommended Usage
//!
//! ```ignore
//! use pm25_sim::db::{services, RepositoryFactory};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = RepositoryFactory::from_default_config()?;
//!     let history = services::list_history(repo.as_ref()).await?;
//!     Ok(())
//! }
//! ```

pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;

#[cfg(test)]
#[path = "services_tests.rs"]
mod services_tests;

/// Default history file name, relative to the working directory.
pub const DEFAULT_HISTORY_FILE: &str = "pm25_history.json";

pub use services::{clear_history, health_check, list_history, record_run};

pub use factory::{RepositoryFactory, RepositoryType};
pub use repo_config::RepositoryConfig;
#[cfg(feature = "json-file-repo")]
pub use repositories::JsonFileRepository;
pub use repositories::LocalRepository;
pub use repository::{ErrorContext, HistoryRepository, RepositoryError, RepositoryResult};
