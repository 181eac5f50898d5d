//! SQLite reference implementation of the [`Repository`] port
//!
//! The production system's state store is Spanner-backed; this adapter
//! exists for local runs, tests, and anyone standing up a smaller deployment.
//! Every method runs its `rusqlite::Connection` work inside
//! `spawn_blocking` since the trait is async.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension};

use crate::errors::{from_rusqlite, Result};
use wsn_core::ports::{NotificationEvent, Repository, SavedSearch, SavedSearchState, StateUpdate};

pub struct SqliteRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRepository {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    fn conn_handle(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }
}

#[async_trait]
impl Repository for SqliteRepository {
    async fn try_acquire_lock(
        &self,
        search_id: &str,
        snapshot_type: &str,
        worker_id: &str,
        ttl: Duration,
    ) -> Result<bool> {
        let search_id = search_id.to_string();
        let snapshot_type = snapshot_type.to_string();
        let worker_id = worker_id.to_string();
        let ttl_secs = ttl.as_secs() as i64;
        let conn = self.conn_handle();

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().unwrap();
            let now = chrono::Utc::now().timestamp();
            let expires_at = now + ttl_secs;

            let existing: Option<(Option<String>, Option<i64>)> = conn
                .query_row(
                    "SELECT lock_holder, lock_expires_at FROM search_state
                     WHERE search_id = ?1 AND snapshot_type = ?2",
                    rusqlite::params![search_id, snapshot_type],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()
                .map_err(|e| from_rusqlite("try_acquire_lock_select", e))?;

            let may_acquire = match &existing {
                None => true,
                Some((holder, expires)) => {
                    holder.as_deref() == Some(worker_id.as_str())
                        || expires.map(|e| e < now).unwrap_or(true)
                }
            };

            if !may_acquire {
                return Ok(false);
            }

            if existing.is_some() {
                conn.execute(
                    "UPDATE search_state SET lock_holder = ?1, lock_expires_at = ?2, updated_at = ?3
                     WHERE search_id = ?4 AND snapshot_type = ?5",
                    rusqlite::params![worker_id, expires_at, now, search_id, snapshot_type],
                )
                .map_err(|e| from_rusqlite("try_acquire_lock_update", e))?;
            } else {
                conn.execute(
                    "INSERT INTO search_state (search_id, snapshot_type, lock_holder, lock_expires_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    rusqlite::params![search_id, snapshot_type, worker_id, expires_at, now],
                )
                .map_err(|e| from_rusqlite("try_acquire_lock_insert", e))?;
            }

            Ok(true)
        })
        .await
        .map_err(|e| crate::errors::task_join_error("try_acquire_lock_join", &e.to_string()))?
    }

    async fn release_lock(&self, search_id: &str, snapshot_type: &str, worker_id: &str) -> Result<()> {
        let search_id = search_id.to_string();
        let snapshot_type = snapshot_type.to_string();
        let worker_id = worker_id.to_string();
        let conn = self.conn_handle();

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().unwrap();
            conn.execute(
                "UPDATE search_state SET lock_holder = NULL, lock_expires_at = NULL
                 WHERE search_id = ?1 AND snapshot_type = ?2 AND lock_holder = ?3",
                rusqlite::params![search_id, snapshot_type, worker_id],
            )
            .map_err(|e| from_rusqlite("release_lock", e))?;
            Ok(())
        })
        .await
        .map_err(|e| crate::errors::task_join_error("release_lock_join", &e.to_string()))?
    }

    async fn get_saved_search(&self, search_id: &str) -> Result<SavedSearch> {
        let search_id = search_id.to_string();
        let conn = self.conn_handle();

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().unwrap();
            conn.query_row(
                "SELECT search_id, query FROM saved_searches WHERE search_id = ?1",
                [&search_id],
                |row| {
                    Ok(SavedSearch {
                        search_id: row.get(0)?,
                        query: row.get(1)?,
                    })
                },
            )
            .map_err(|e| from_rusqlite("get_saved_search", e))
        })
        .await
        .map_err(|e| crate::errors::task_join_error("get_saved_search_join", &e.to_string()))?
    }

    async fn get_saved_search_state(
        &self,
        search_id: &str,
        snapshot_type: &str,
    ) -> Result<Option<SavedSearchState>> {
        let search_id = search_id.to_string();
        let snapshot_type = snapshot_type.to_string();
        let conn = self.conn_handle();

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().unwrap();
            conn.query_row(
                "SELECT state_blob_path, last_query_signature FROM search_state
                 WHERE search_id = ?1 AND snapshot_type = ?2",
                rusqlite::params![search_id, snapshot_type],
                |row| {
                    Ok(SavedSearchState {
                        state_blob_path: row.get(0)?,
                        last_query_signature: row.get(1)?,
                    })
                },
            )
            .optional()
            .map_err(|e| from_rusqlite("get_saved_search_state", e))
        })
        .await
        .map_err(|e| crate::errors::task_join_error("get_saved_search_state_join", &e.to_string()))?
    }

    async fn update_state_only(
        &self,
        search_id: &str,
        snapshot_type: &str,
        worker_id: &str,
        update: StateUpdate,
    ) -> Result<()> {
        let search_id = search_id.to_string();
        let snapshot_type = snapshot_type.to_string();
        let worker_id = worker_id.to_string();
        let conn = self.conn_handle();

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().unwrap();
            let now = chrono::Utc::now().timestamp();
            conn.execute(
                "INSERT INTO search_state (search_id, snapshot_type, state_blob_path, lock_holder, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(search_id, snapshot_type) DO UPDATE SET
                    state_blob_path = excluded.state_blob_path,
                    updated_at = excluded.updated_at",
                rusqlite::params![search_id, snapshot_type, update.state_blob_path, worker_id, now],
            )
            .map_err(|e| from_rusqlite("update_state_only", e))?;
            Ok(())
        })
        .await
        .map_err(|e| crate::errors::task_join_error("update_state_only_join", &e.to_string()))?
    }

    async fn publish_event(&self, event: NotificationEvent) -> Result<()> {
        let conn = self.conn_handle();

        tokio::task::spawn_blocking(move || {
            let mut conn = conn.lock().unwrap();
            let now = chrono::Utc::now().timestamp();
            let reasons_json = serde_json::to_string(&event.reasons).unwrap_or_else(|_| "[]".to_string());

            let tx = conn
                .transaction()
                .map_err(|e| from_rusqlite("publish_event_begin_tx", e))?;

            tx.execute(
                "INSERT INTO notification_events
                    (event_id, search_id, snapshot_type, reasons, diff_blob_path, summary, new_state_path, worker_id, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                rusqlite::params![
                    event.event_id,
                    event.search_id,
                    event.snapshot_type,
                    reasons_json,
                    event.diff_blob_path,
                    event.summary,
                    event.new_state_path,
                    event.worker_id,
                    now,
                ],
            )
            .map_err(|e| from_rusqlite("publish_event_insert", e))?;

            tx.execute(
                "INSERT INTO search_state (search_id, snapshot_type, state_blob_path, last_event_id, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(search_id, snapshot_type) DO UPDATE SET
                    state_blob_path = excluded.state_blob_path,
                    last_event_id = excluded.last_event_id,
                    updated_at = excluded.updated_at",
                rusqlite::params![
                    event.search_id,
                    event.snapshot_type,
                    event.new_state_path,
                    event.event_id,
                    now,
                ],
            )
            .map_err(|e| from_rusqlite("publish_event_advance_state", e))?;

            tx.commit()
                .map_err(|e| from_rusqlite("publish_event_commit", e))?;

            Ok(())
        })
        .await
        .map_err(|e| crate::errors::task_join_error("publish_event_join", &e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations;
    use std::time::Duration;

    fn setup() -> SqliteRepository {
        let mut conn = Connection::open_in_memory().unwrap();
        migrations::apply_migrations(&mut conn).unwrap();
        conn.execute(
            "INSERT INTO saved_searches (search_id, query, updated_at) VALUES ('s1', 'cat:foo', 0)",
            [],
        )
        .unwrap();
        SqliteRepository::new(conn)
    }

    #[tokio::test]
    async fn lock_roundtrip() {
        let repo = setup();
        assert!(repo
            .try_acquire_lock("s1", "regular", "w1", Duration::from_secs(60))
            .await
            .unwrap());
        assert!(!repo
            .try_acquire_lock("s1", "regular", "w2", Duration::from_secs(60))
            .await
            .unwrap());
        repo.release_lock("s1", "regular", "w1").await.unwrap();
        assert!(repo
            .try_acquire_lock("s1", "regular", "w2", Duration::from_secs(60))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn expired_lock_can_be_reacquired_by_another_worker() {
        let repo = setup();
        repo.try_acquire_lock("s1", "regular", "w1", Duration::from_secs(0))
            .await
            .unwrap();
        std::thread::sleep(Duration::from_millis(1100));
        assert!(repo
            .try_acquire_lock("s1", "regular", "w2", Duration::from_secs(60))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn get_saved_search_returns_stored_query() {
        let repo = setup();
        let search = repo.get_saved_search("s1").await.unwrap();
        assert_eq!(search.query, "cat:foo");
    }

    #[tokio::test]
    async fn missing_state_returns_none() {
        let repo = setup();
        let state = repo.get_saved_search_state("s1", "regular").await.unwrap();
        assert_eq!(state, None);
    }

    #[tokio::test]
    async fn publish_event_advances_state_pointer() {
        let repo = setup();
        repo.publish_event(NotificationEvent {
            event_id: "e1".to_string(),
            search_id: "s1".to_string(),
            snapshot_type: "regular".to_string(),
            reasons: vec!["DATA_UPDATED".to_string()],
            diff_blob_path: "diffs/s1/e1".to_string(),
            summary: "1 feature added".to_string(),
            new_state_path: "state/s1/v2".to_string(),
            worker_id: "w1".to_string(),
        })
        .await
        .unwrap();

        let state = repo
            .get_saved_search_state("s1", "regular")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(state.state_blob_path, Some("state/s1/v2".to_string()));
    }
}
