//! Application state for the HTTP server.

use std::sync::Arc;

use chrono::Duration;

use crate::db::repository::HistoryRepository;
use crate::services::session::SessionStore;

/// Default idle time after which a session and its baseline are dropped.
pub const DEFAULT_SESSION_IDLE_SECS: i64 = 3600;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// History storage backend
    pub repository: Arc<dyn HistoryRepository>,
    /// Per-session baselines
    pub sessions: SessionStore,
    /// Sessions idle longer than this are purged
    pub session_idle: Duration,
}

impl AppState {
    /// Create a new application state with the given repository.
    pub fn new(repository: Arc<dyn HistoryRepository>) -> Self {
        Self {
            repository,
            sessions: SessionStore::new(),
            session_idle: Duration::seconds(DEFAULT_SESSION_IDLE_SECS),
        }
    }

    /// Override the session idle limit.
    pub fn with_session_idle(mut self, idle: Duration) -> Self {
        self.session_idle = idle;
        self
    }
}
