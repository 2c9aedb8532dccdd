//! Service functions over any [`HistoryRepository`].
//!
//! Callers should go through these instead of the trait methods so logging
//! and error context are applied consistently.

use log::{debug, info};

use super::repository::{HistoryRepository, RepositoryResult};
use crate::models::{EstimationResult, HistoryRecord, InputSet};

/// Append one calculation run to the history.
///
/// # Returns
/// History length after the append.
pub async fn record_run(
    repo: &dyn HistoryRepository,
    inputs: InputSet,
    result: &EstimationResult,
) -> RepositoryResult<usize> {
    let record = HistoryRecord::new(inputs, result);
    let len = repo
        .append(record)
        .await
        .map_err(|e| e.with_operation("record_run"))?;
    debug!(
        "recorded run #{} pm25={:.2} level={}",
        len, result.concentration, result.level
    );
    Ok(len)
}

/// Full history in run order.
pub async fn list_history(repo: &dyn HistoryRepository) -> RepositoryResult<Vec<HistoryRecord>> {
    repo.load_all()
        .await
        .map_err(|e| e.with_operation("list_history"))
}

/// Drop every stored record.
pub async fn clear_history(repo: &dyn HistoryRepository) -> RepositoryResult<()> {
    repo.clear()
        .await
        .map_err(|e| e.with_operation("clear_history"))?;
    info!("history cleared ({})", repo.backend_name());
    Ok(())
}

/// Whether the backing store is reachable.
pub async fn health_check(repo: &dyn HistoryRepository) -> RepositoryResult<bool> {
    repo.health_check().await
}
