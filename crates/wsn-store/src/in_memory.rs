//! In-memory adapters for all four ports
//!
//! HashMap-backed, not thread-contended at any scale that matters for
//! tests. Grounded on `ettlex-core`'s `ops::store::Store`: one struct per
//! port, plain maps, `Mutex`-guarded interior mutability so the port
//! methods can take `&self`.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;

use wsn_core::diff::{FeatureOracle, OracleOutcome};
use wsn_core::errors::{DifferError, ErrorKind, Result};
use wsn_core::model::convert::LiveFeatureRecord;
use wsn_core::ports::{
    BlobStore, FeatureFetcher, NotificationEvent, Publisher, Repository, SavedSearch,
    SavedSearchState, StateUpdate,
};

fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

/// In-memory [`BlobStore`]. Write-once: rewriting a path with different
/// content is a collision, same as the filesystem adapter.
#[derive(Default)]
pub struct InMemoryBlobStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn read(&self, path: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.blobs.lock().unwrap().get(path).cloned())
    }

    async fn write(&self, path: &str, bytes: &[u8]) -> Result<()> {
        let mut blobs = self.blobs.lock().unwrap();
        if let Some(existing) = blobs.get(path) {
            if existing.as_slice() == bytes {
                return Ok(());
            }
            return Err(DifferError::new(ErrorKind::BlobStoreError)
                .with_op("blob_write")
                .with_message(format!("write-once violation: path {path} already holds different content")));
        }
        blobs.insert(path.to_string(), bytes.to_vec());
        Ok(())
    }
}

/// In-memory [`Publisher`]. Collects published payloads for inspection;
/// returns a synthetic message id.
#[derive(Default)]
pub struct InMemoryPublisher {
    published: Mutex<Vec<(String, Vec<u8>)>>,
}

impl InMemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> Vec<(String, Vec<u8>)> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl Publisher for InMemoryPublisher {
    async fn publish(&self, topic_id: &str, bytes: &[u8]) -> Result<String> {
        let mut published = self.published.lock().unwrap();
        let message_id = format!("msg-{}", published.len() + 1);
        published.push((topic_id.to_string(), bytes.to_vec()));
        Ok(message_id)
    }
}

struct LockEntry {
    holder: String,
    expires_at: i64,
}

/// In-memory [`Repository`]. One map for saved searches, one for state
/// pointers keyed by `(search_id, snapshot_type)`, one for locks, one
/// append-only event log.
#[derive(Default)]
pub struct InMemoryRepository {
    saved_searches: Mutex<HashMap<String, SavedSearch>>,
    state: Mutex<HashMap<(String, String), SavedSearchState>>,
    locks: Mutex<HashMap<(String, String), LockEntry>>,
    events: Mutex<Vec<NotificationEvent>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_saved_search(&self, search: SavedSearch) {
        self.saved_searches
            .lock()
            .unwrap()
            .insert(search.search_id.clone(), search);
    }

    pub fn events(&self) -> Vec<NotificationEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn try_acquire_lock(
        &self,
        search_id: &str,
        snapshot_type: &str,
        worker_id: &str,
        ttl: Duration,
    ) -> Result<bool> {
        let mut locks = self.locks.lock().unwrap();
        let key = (search_id.to_string(), snapshot_type.to_string());
        let now = now_secs();

        let may_acquire = match locks.get(&key) {
            None => true,
            Some(entry) => entry.holder == worker_id || entry.expires_at < now,
        };

        if !may_acquire {
            return Ok(false);
        }

        locks.insert(
            key,
            LockEntry {
                holder: worker_id.to_string(),
                expires_at: now + ttl.as_secs() as i64,
            },
        );
        Ok(true)
    }

    async fn release_lock(&self, search_id: &str, snapshot_type: &str, worker_id: &str) -> Result<()> {
        let mut locks = self.locks.lock().unwrap();
        let key = (search_id.to_string(), snapshot_type.to_string());
        if let Some(entry) = locks.get(&key) {
            if entry.holder == worker_id {
                locks.remove(&key);
            }
        }
        Ok(())
    }

    async fn get_saved_search(&self, search_id: &str) -> Result<SavedSearch> {
        self.saved_searches
            .lock()
            .unwrap()
            .get(search_id)
            .cloned()
            .ok_or_else(|| {
                DifferError::new(ErrorKind::RepositoryError)
                    .with_op("get_saved_search")
                    .with_search_id(search_id)
                    .with_message("saved search not found")
            })
    }

    async fn get_saved_search_state(
        &self,
        search_id: &str,
        snapshot_type: &str,
    ) -> Result<Option<SavedSearchState>> {
        let key = (search_id.to_string(), snapshot_type.to_string());
        Ok(self.state.lock().unwrap().get(&key).cloned())
    }

    async fn update_state_only(
        &self,
        search_id: &str,
        snapshot_type: &str,
        _worker_id: &str,
        update: StateUpdate,
    ) -> Result<()> {
        let key = (search_id.to_string(), snapshot_type.to_string());
        let mut state = self.state.lock().unwrap();
        let entry = state.entry(key).or_default();
        entry.state_blob_path = Some(update.state_blob_path);
        Ok(())
    }

    async fn publish_event(&self, event: NotificationEvent) -> Result<()> {
        let key = (event.search_id.clone(), event.snapshot_type.clone());
        {
            let mut state = self.state.lock().unwrap();
            let entry = state.entry(key).or_default();
            entry.state_blob_path = Some(event.new_state_path.clone());
        }
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

/// In-memory [`FeatureFetcher`]/[`FeatureOracle`]. Backed by a fixed set of
/// live records plus an oracle answer table keyed by feature id, for
/// exercising move/split reconciliation without a network call.
#[derive(Default)]
pub struct InMemoryFeatureFetcher {
    records: Mutex<Vec<LiveFeatureRecord>>,
    oracle_answers: Mutex<HashMap<String, OracleOutcome>>,
}

impl InMemoryFeatureFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_records(&self, records: Vec<LiveFeatureRecord>) {
        *self.records.lock().unwrap() = records;
    }

    pub fn set_oracle_answer(&self, id: impl Into<String>, outcome: OracleOutcome) {
        self.oracle_answers.lock().unwrap().insert(id.into(), outcome);
    }
}

#[async_trait]
impl FeatureOracle for InMemoryFeatureFetcher {
    async fn get_feature(&self, id: &str) -> Result<OracleOutcome> {
        Ok(self
            .oracle_answers
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .unwrap_or(OracleOutcome::DoesNotExist))
    }
}

#[async_trait]
impl FeatureFetcher for InMemoryFeatureFetcher {
    async fn fetch_features(&self, _query: &str) -> Result<Vec<LiveFeatureRecord>> {
        Ok(self.records.lock().unwrap().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn blob_store_is_write_once() {
        let store = InMemoryBlobStore::new();
        store.write("p", b"a").await.unwrap();
        store.write("p", b"a").await.unwrap();
        let err = store.write("p", b"b").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BlobStoreError);
    }

    #[tokio::test]
    async fn repository_lock_is_exclusive_until_released() {
        let repo = InMemoryRepository::new();
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
    async fn publisher_records_every_publish() {
        let publisher = InMemoryPublisher::new();
        publisher.publish("topic", b"payload").await.unwrap();
        assert_eq!(publisher.published().len(), 1);
    }

    #[tokio::test]
    async fn fetcher_oracle_defaults_to_does_not_exist() {
        let fetcher = InMemoryFeatureFetcher::new();
        let outcome = fetcher.get_feature("missing").await.unwrap();
        assert_eq!(outcome, OracleOutcome::DoesNotExist);
    }
}
