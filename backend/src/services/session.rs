//! Per-session baseline storage.
//!
//! Each client session owns at most one baseline: the inputs of its most
//! recent "calculate" action. Scenario actions read it, "clear" removes it.
//! Sessions idle longer than the configured limit are dropped by
//! [`SessionStore::purge_idle`].

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::InputSet;

/// Opaque session identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        SessionId(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(SessionId)
    }
}

/// Session metadata and baseline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub baseline: Option<InputSet>,
    pub created_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

/// In-memory session store shared across handlers.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty session and return its ID.
    pub fn create(&self) -> SessionId {
        let now = Utc::now();
        let id = SessionId::new();
        self.sessions.write().insert(
            id,
            Session {
                id,
                baseline: None,
                created_at: now,
                last_seen: now,
            },
        );
        id
    }

    /// Return the given session if it exists, otherwise a fresh one.
    ///
    /// Known sessions have their `last_seen` refreshed.
    pub fn resolve(&self, requested: Option<SessionId>) -> SessionId {
        if let Some(id) = requested {
            if let Some(session) = self.sessions.write().get_mut(&id) {
                session.last_seen = Utc::now();
                return id;
            }
        }
        self.create()
    }

    /// Current baseline of a session.
    pub fn baseline(&self, id: SessionId) -> Option<InputSet> {
        self.sessions.read().get(&id).and_then(|s| s.baseline)
    }

    /// Replace the baseline of a session. Unknown IDs are ignored.
    pub fn set_baseline(&self, id: SessionId, inputs: InputSet) {
        if let Some(session) = self.sessions.write().get_mut(&id) {
            session.baseline = Some(inputs);
            session.last_seen = Utc::now();
        }
    }

    /// Remove the baseline of a session, returning the previous value.
    pub fn clear_baseline(&self, id: SessionId) -> Option<InputSet> {
        self.sessions
            .write()
            .get_mut(&id)
            .and_then(|s| s.baseline.take())
    }

    /// Drop sessions not seen for longer than `max_idle`.
    ///
    /// # Returns
    /// Number of sessions removed.
    pub fn purge_idle(&self, max_idle: Duration) -> usize {
        let cutoff = Utc::now() - max_idle;
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, s| s.last_seen >= cutoff);
        before - sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}
