//! History repository persisted as a single JSON array on disk.
//!
//! Every mutation rewrites the whole file: the current array is read, the
//! change is applied in memory and the result is written to a sibling
//! temporary file which then replaces the original with a rename. All
//! mutations go through one async writer lock, so concurrent requests are
//! applied one after another and no append is lost.
//!
//! A missing, unreadable or corrupt file reads as an empty history.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::{debug, warn};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::db::repository::{
    ErrorContext, HistoryRepository, RepositoryError, RepositoryResult,
};
use crate::db::DEFAULT_HISTORY_FILE;
use crate::models::HistoryRecord;

const INDENT: &[u8] = b"    ";

/// JSON file backed history.
#[derive(Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
    pretty: bool,
    write_lock: Mutex<()>,
}

impl JsonFileRepository {
    /// Create a repository writing pretty-printed JSON to `path`.
    ///
    /// The file is not touched until the first read or mutation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pretty: true,
            write_lock: Mutex::new(()),
        }
    }

    /// Toggle pretty printing (4-space indentation) of the stored array.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn context(&self, operation: &str) -> ErrorContext {
        ErrorContext::new(operation)
            .with_entity("history_file")
            .with_entity_id(self.path.display())
    }

    async fn read_records(&self) -> Vec<HistoryRecord> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("history file {} not found, starting empty", self.path.display());
                return Vec::new();
            }
            Err(e) => {
                warn!(
                    "failed to read history file {}: {}; treating as empty",
                    self.path.display(),
                    e
                );
                return Vec::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(records) => records,
            Err(e) => {
                warn!(
                    "history file {} is corrupt: {}; treating as empty",
                    self.path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    fn encode(&self, records: &[HistoryRecord], operation: &str) -> RepositoryResult<Vec<u8>> {
        let result = if self.pretty {
            let mut buf = Vec::new();
            let written = {
                let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
                let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
                records.serialize(&mut ser)
            };
            written.map(|()| buf)
        } else {
            serde_json::to_vec(records)
        };

        result.map_err(|e| {
            RepositoryError::serialization_with_context(e.to_string(), self.context(operation))
        })
    }

    async fn write_records(&self, records: &[HistoryRecord], operation: &str) -> RepositoryResult<()> {
        let bytes = self.encode(records, operation)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| RepositoryError::from_io(&e, self.context(operation)))?;
        }

        let tmp_path = self.temp_path();
        tokio::fs::write(&tmp_path, &bytes)
            .await
            .map_err(|e| RepositoryError::from_io(&e, self.context(operation)))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| RepositoryError::from_io(&e, self.context(operation)))?;

        debug!(
            "{}: wrote {} records to {}",
            operation,
            records.len(),
            self.path.display()
        );
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| DEFAULT_HISTORY_FILE.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Default for JsonFileRepository {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_FILE)
    }
}

#[async_trait]
impl HistoryRepository for JsonFileRepository {
    async fn append(&self, record: HistoryRecord) -> RepositoryResult<usize> {
        // serde_json writes non-finite floats as null, which would make the
        // whole file unreadable on the next load
        if !record.is_finite() {
            return Err(RepositoryError::serialization_with_context(
                "record contains a non-finite value",
                self.context("append"),
            ));
        }

        let _guard = self.write_lock.lock().await;
        let mut records = self.read_records().await;
        records.push(record);
        self.write_records(&records, "append").await?;
        Ok(records.len())
    }

    async fn load_all(&self) -> RepositoryResult<Vec<HistoryRecord>> {
        Ok(self.read_records().await)
    }

    async fn clear(&self) -> RepositoryResult<()> {
        let _guard = self.write_lock.lock().await;
        self.write_records(&[], "clear").await
    }

    async fn health_check(&self) -> RepositoryResult<bool> {
        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => parent.to_path_buf(),
            None => PathBuf::from("."),
        };
        match tokio::fs::metadata(&dir).await {
            Ok(meta) => Ok(meta.is_dir()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(RepositoryError::from_io(&e, self.context("health_check"))),
        }
    }

    fn backend_name(&self) -> &'static str {
        "json_file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_path_is_sibling() {
        let repo = JsonFileRepository::new("/var/lib/pm25/history.json");
        assert_eq!(
            repo.temp_path(),
            PathBuf::from("/var/lib/pm25/history.json.tmp")
        );
    }

    #[test]
    fn test_encode_uses_four_space_indent() {
        use crate::algorithms::estimate;
        use crate::models::InputSet;

        let inputs = InputSet::new(1.0, 0.0, 0.0, 0.0);
        let record = HistoryRecord::new(inputs, &estimate(&inputs));
        let repo = JsonFileRepository::new("unused.json");
        let bytes = repo.encode(&[record], "append").unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.starts_with("[\n    {\n        \"traffic\""));
    }

    #[test]
    fn test_encode_empty_array() {
        let repo = JsonFileRepository::new("unused.json");
        let bytes = repo.encode(&[], "clear").unwrap();
        assert_eq!(bytes, b"[]");
    }
}
