//! Repository implementations module.
//!
//! This module contains the implementations of the `HistoryRepository` trait:
//! - `json_file`: JSON array on disk, the persistent backend
//! - `local`: In-memory implementation for unit testing and local development
#[cfg(feature = "json-file-repo")]
pub mod json_file;
pub mod local;

#[cfg(feature = "json-file-repo")]
pub use json_file::JsonFileRepository;
pub use local::LocalRepository;
