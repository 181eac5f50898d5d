//! The persisted-state repository contract

use async_trait::async_trait;

use crate::errors::Result;

/// A saved search's definition, as far as the differ needs to know it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedSearch {
    pub search_id: String,
    pub query: String,
}

/// The `(searchId, snapshotType)` state pointer row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SavedSearchState {
    pub state_blob_path: Option<String>,
    pub last_query_signature: Option<String>,
}

/// Fields written back atomically with the new notification event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateUpdate {
    pub state_blob_path: String,
}

/// A fully formed notification event, ready to be inserted and have the
/// state pointer advanced in the same transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEvent {
    pub event_id: String,
    pub search_id: String,
    pub snapshot_type: String,
    pub reasons: Vec<String>,
    pub diff_blob_path: String,
    pub summary: String,
    pub new_state_path: String,
    pub worker_id: String,
}

/// The Spanner-backed (or equivalent) persisted-state store. Its schema and
/// migrations are out of scope for the core; this trait is the only surface
/// the worker and differ orchestrators see.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Fail-fast lock acquisition: `Ok(true)` if this worker now holds the
    /// lock, `Ok(false)` if another holder does.
    async fn try_acquire_lock(
        &self,
        search_id: &str,
        snapshot_type: &str,
        worker_id: &str,
        ttl: std::time::Duration,
    ) -> Result<bool>;

    /// Best-effort release. The lock's TTL is the backstop if this fails.
    async fn release_lock(&self, search_id: &str, snapshot_type: &str, worker_id: &str) -> Result<()>;

    async fn get_saved_search(&self, search_id: &str) -> Result<SavedSearch>;

    async fn get_saved_search_state(
        &self,
        search_id: &str,
        snapshot_type: &str,
    ) -> Result<Option<SavedSearchState>>;

    /// Advance the state pointer without inserting an event — used for the
    /// cold-start-without-event choice (see the differ orchestrator).
    async fn update_state_only(
        &self,
        search_id: &str,
        snapshot_type: &str,
        worker_id: &str,
        update: StateUpdate,
    ) -> Result<()>;

    /// Atomically insert the notification event row and advance the state
    /// pointer to `event.new_state_path`.
    async fn publish_event(&self, event: NotificationEvent) -> Result<()>;
}
