//! Worker orchestrator.
//!
//! ## Steps (in order):
//! 1. Lock: fail-fast `TryAcquireLock`; another holder is an ack, not an error
//! 2. Fetch inputs: saved-search definition, `(stateBlobPath, lastQuerySignature)`
//! 3. Load prior blob; a missing blob despite the pointer degrades to cold start
//! 4. Invoke the differ; `Fatal` acks the job, `Transient` propagates
//! 5. No changes: return without touching state or events
//! 6. Write the new snapshot blob to a fresh unique path
//! 7. Write the diff blob under `events/{searchId}/{eventId}`
//! 8. Commit: insert the notification event and advance the state pointer
//!    in one call
//! 9. Publish `{eventId}` to the downstream topic, outside the transaction
//! 10. Release the lock via the guaranteed-release path
//!
//! Step 1's lock release is guaranteed by running the rest of the pipeline
//! behind a single call site in [`Worker::process`] that releases the lock
//! after `process_locked` returns, regardless of its outcome — Rust has no
//! async `Drop`, so this stands in for the scoped-finalizer pattern.

use std::sync::Arc;
use std::time::{Duration, Instant};

use uuid::Uuid;

use wsn_core::errors::{DifferError, ErrorClass, ErrorKind, Result};
use wsn_core::ports::{BlobStore, NotificationEvent, Publisher, Repository};

use crate::differ::{Differ, RunInput};

/// Inbound job envelope: `{searchId, snapshotType, workerId}`.
#[derive(Debug, Clone)]
pub struct Job {
    pub search_id: String,
    pub snapshot_type: String,
    pub worker_id: String,
}

pub struct WorkerConfig {
    pub lock_ttl: Duration,
    pub notification_topic_id: String,
    pub state_bucket_prefix: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            lock_ttl: Duration::from_secs(600),
            notification_topic_id: "saved-search-events".to_string(),
            state_bucket_prefix: String::new(),
        }
    }
}

pub struct Worker {
    repo: Arc<dyn Repository>,
    blobs: Arc<dyn BlobStore>,
    publisher: Arc<dyn Publisher>,
    differ: Differ,
    config: WorkerConfig,
}

impl Worker {
    pub fn new(
        repo: Arc<dyn Repository>,
        blobs: Arc<dyn BlobStore>,
        publisher: Arc<dyn Publisher>,
        differ: Differ,
        config: WorkerConfig,
    ) -> Self {
        Self {
            repo,
            blobs,
            publisher,
            differ,
            config,
        }
    }

    pub async fn process(&self, job: Job) -> Result<()> {
        let start = Instant::now();
        wsn_core::log_op_start!(
            "worker_process",
            search_id = job.search_id.as_str(),
            snapshot_type = job.snapshot_type.as_str()
        );

        // Step 1: lock
        let acquired = self
            .repo
            .try_acquire_lock(&job.search_id, &job.snapshot_type, &job.worker_id, self.config.lock_ttl)
            .await;

        let acquired = match acquired {
            Ok(acquired) => acquired,
            Err(e) => {
                let duration_ms = start.elapsed().as_millis() as u64;
                wsn_core::log_op_error!("worker_process", e.clone(), duration_ms = duration_ms);
                return Err(e);
            }
        };

        if !acquired {
            let duration_ms = start.elapsed().as_millis() as u64;
            wsn_core::log_op_end!(
                "worker_process",
                duration_ms = duration_ms,
                lock_held_elsewhere = true
            );
            return Ok(());
        }

        let result = self.process_locked(&job).await;

        // Step 10: release, regardless of how process_locked exited
        if let Err(release_err) = self.repo.release_lock(&job.search_id, &job.snapshot_type, &job.worker_id).await {
            tracing::warn!(
                component = module_path!(),
                op = "worker_process",
                search_id = job.search_id.as_str(),
                err_code = release_err.code(),
                "lock release failed; relying on ttl to reclaim it",
            );
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => wsn_core::log_op_end!("worker_process", duration_ms = duration_ms),
            Err(e) => wsn_core::log_op_error!("worker_process", e.clone(), duration_ms = duration_ms),
        }
        result
    }

    async fn process_locked(&self, job: &Job) -> Result<()> {
        // Step 2: fetch inputs
        let saved_search = self.repo.get_saved_search(&job.search_id).await?;
        let state = self
            .repo
            .get_saved_search_state(&job.search_id, &job.snapshot_type)
            .await?;

        // Step 3: load prior blob, with missing-blob resilience
        let previous_state_bytes = match state.as_ref().and_then(|s| s.state_blob_path.clone()) {
            None => None,
            Some(path) => match self.blobs.read(&path).await? {
                Some(bytes) => Some(bytes),
                None => {
                    tracing::warn!(
                        component = module_path!(),
                        op = "worker_process",
                        search_id = job.search_id.as_str(),
                        state_blob_path = path.as_str(),
                        "state pointer referenced a missing blob; treating as cold start",
                    );
                    None
                }
            },
        };

        let event_id = Uuid::now_v7().to_string();

        // Step 4: invoke the differ
        let diff_result = self
            .differ
            .run(RunInput {
                search_id: job.search_id.clone(),
                query: saved_search.query.clone(),
                event_id: event_id.clone(),
                previous_state_bytes,
            })
            .await;

        let diff_result = match diff_result {
            Ok(r) => r,
            Err(e) if e.class() == ErrorClass::Fatal => {
                tracing::error!(
                    component = module_path!(),
                    op = "worker_process",
                    search_id = job.search_id.as_str(),
                    err_code = e.code(),
                    "differ returned a fatal error; acking the job without retry",
                );
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        // Step 5: no changes
        if !diff_result.has_changes {
            return Ok(());
        }

        let new_state_id = diff_result
            .new_state_id
            .clone()
            .ok_or_else(|| DifferError::new(ErrorKind::Internal).with_message("has_changes without a new_state_id"))?;
        let new_snapshot_bytes = diff_result
            .new_snapshot_bytes
            .ok_or_else(|| DifferError::new(ErrorKind::Internal).with_message("has_changes without snapshot bytes"))?;
        let diff_blob_bytes = diff_result
            .diff_blob_bytes
            .ok_or_else(|| DifferError::new(ErrorKind::Internal).with_message("has_changes without diff bytes"))?;
        let summary = diff_result
            .summary
            .ok_or_else(|| DifferError::new(ErrorKind::Internal).with_message("has_changes without a summary"))?;

        // Step 6: write new snapshot blob
        let state_path = self.snapshot_path(&job.search_id, &job.snapshot_type, &new_state_id);
        self.blobs.write(&state_path, &new_snapshot_bytes).await?;

        // Step 7: write diff blob
        let diff_path = self.event_path(&job.search_id, &event_id);
        self.blobs.write(&diff_path, &diff_blob_bytes).await?;

        // Step 8: commit
        self.repo
            .publish_event(NotificationEvent {
                event_id: event_id.clone(),
                search_id: job.search_id.clone(),
                snapshot_type: job.snapshot_type.clone(),
                reasons: diff_result.reasons,
                diff_blob_path: diff_path,
                summary: summary.text,
                new_state_path: state_path,
                worker_id: job.worker_id.clone(),
            })
            .await?;

        // Step 9: publish, outside the transaction; a failure here is
        // transient and a retry may produce a duplicate event rather than
        // lose one
        let envelope = serde_json::json!({ "eventId": event_id }).to_string();
        self.publisher
            .publish(&self.config.notification_topic_id, envelope.as_bytes())
            .await?;

        Ok(())
    }

    fn snapshot_path(&self, search_id: &str, snapshot_type: &str, state_id: &str) -> String {
        format!(
            "{}searches/{search_id}/{snapshot_type}/state_{state_id}",
            self.config.state_bucket_prefix
        )
    }

    fn event_path(&self, search_id: &str, event_id: &str) -> String {
        format!("{}events/{search_id}/{event_id}", self.config.state_bucket_prefix)
    }
}
