//! Process-wide session registry.
//!
//! Maps a session id (UUID string handed to the client at upload time) to
//! the agent built for that upload. Sessions are never updated after
//! creation and never evicted; the registry lives and dies with the
//! process. Handlers receive the registry through `AppState` so a durable
//! store could replace it without touching route logic.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::agents::TabularAgent;

#[derive(Clone)]
pub struct SessionRecord {
    pub session_id: String,
    pub file_path: PathBuf,
    pub columns: Vec<String>,
    pub row_count: usize,
    pub agent: Arc<TabularAgent>,
}

#[derive(Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<RwLock<HashMap<String, SessionRecord>>>,
}

impl SessionRegistry {
    /// Insert unconditionally; a reused id (never expected with UUID-v4)
    /// is last-write-wins.
    pub async fn insert(&self, record: SessionRecord) {
        let mut guard = self.inner.write().await;
        guard.insert(record.session_id.clone(), record);
    }

    pub async fn get(&self, session_id: &str) -> Option<SessionRecord> {
        let guard = self.inner.read().await;
        guard.get(session_id).cloned()
    }

    pub async fn contains(&self, session_id: &str) -> bool {
        let guard = self.inner.read().await;
        guard.contains_key(session_id)
    }

    pub async fn len(&self) -> usize {
        let guard = self.inner.read().await;
        guard.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
