//! In-memory history repository for unit testing and local development.

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::db::repository::{HistoryRepository, RepositoryResult};
use crate::models::HistoryRecord;

/// History kept in process memory; lost on restart.
#[derive(Debug, Default)]
pub struct LocalRepository {
    records: RwLock<Vec<HistoryRecord>>,
}

impl LocalRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-filled with records.
    pub fn with_records(records: Vec<HistoryRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl HistoryRepository for LocalRepository {
    async fn append(&self, record: HistoryRecord) -> RepositoryResult<usize> {
        let mut records = self.records.write();
        records.push(record);
        Ok(records.len())
    }

    async fn load_all(&self) -> RepositoryResult<Vec<HistoryRecord>> {
        Ok(self.records.read().clone())
    }

    async fn clear(&self) -> RepositoryResult<()> {
        self.records.write().clear();
        Ok(())
    }

    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }

    fn backend_name(&self) -> &'static str {
        "local"
    }
}
