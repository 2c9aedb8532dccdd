//! Repository trait for the calculation history.
//!
//! The history is an ordered, append-only sequence of [`HistoryRecord`]s.
//! Records are never mutated or removed individually; the only destructive
//! operation is [`HistoryRepository::clear`], which drops the whole sequence.

pub mod error;

use async_trait::async_trait;

use crate::models::HistoryRecord;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

/// Storage backend for calculation history.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` and must serialize mutations so that
/// concurrent appends are never lost and keep their call order.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Append one record to the end of the history.
    ///
    /// # Returns
    /// * `Ok(usize)` - History length after the append
    /// * `Err(RepositoryError)` - If the record could not be stored
    async fn append(&self, record: HistoryRecord) -> RepositoryResult<usize>;

    /// Load the full history in chronological order.
    ///
    /// Unreadable or corrupt storage yields an empty history rather than an
    /// error.
    async fn load_all(&self) -> RepositoryResult<Vec<HistoryRecord>>;

    /// Remove every record.
    async fn clear(&self) -> RepositoryResult<()>;

    /// Check that the backing store is usable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Short backend name used in health output and logs.
    fn backend_name(&self) -> &'static str;
}
