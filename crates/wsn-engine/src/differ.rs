//! Differ orchestrator.
//!
//! ## Phases (in order):
//! 1. Load prior context via the codec (empty bytes == cold start)
//! 2. Plan: cold-start / steady / query-changed
//! 3. Fetch current-query live data, and on query-changed also the prior
//!    query's live data (flush); a failed flush degrades to flush-failed
//! 4. Compare prior snapshot vs the target-for-diff (skipped on cold-start
//!    or flush-failed)
//! 5. Reconcile history on any non-empty removed list
//! 6. Mark queryChanged on the diff if planning said so
//! 7. Sort all diff lists deterministically
//! 8. Compute HasChanges
//! 9. No-change short-circuit: return with no blob outputs
//! 10. Encode the new snapshot and diff blobs, compute the summary and
//!     reason set

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use uuid::Uuid;

use wsn_core::diff::{
    compare, reconcile, sort_diff_lists, summarize, FeatureOracle, OracleOutcome, ReconciledDelta,
    Summary,
};
use wsn_core::errors::{DifferError, ErrorKind, Result};
use wsn_core::model::{canonical_feature_from_live, CanonicalFeature, SupportedLeaves};
use wsn_core::ports::FeatureFetcher;
use wsn_core::snapshot::{
    new_diff_blob, new_snapshot, DiffData, DiffMetadata, MigrationRegistry, SnapshotCodec,
    SnapshotMetadata,
};

/// Delegates `FeatureOracle` to a `FeatureFetcher` trait object so
/// `reconcile` can be called without relying on dyn-trait upcasting.
struct OracleRef<'a>(&'a dyn FeatureFetcher);

#[async_trait::async_trait]
impl<'a> FeatureOracle for OracleRef<'a> {
    async fn get_feature(&self, id: &str) -> Result<OracleOutcome> {
        self.0.get_feature(id).await
    }
}

/// Inputs to a single differ run.
pub struct RunInput {
    pub search_id: String,
    pub query: String,
    pub event_id: String,
    /// Bytes of the previously committed snapshot blob, if any. Empty or
    /// absent means cold start.
    pub previous_state_bytes: Option<Vec<u8>>,
}

/// Output of a differ run. `has_changes == false` means no blobs were
/// produced and the caller must not write anything.
#[derive(Debug, Clone, Default)]
pub struct DiffResult {
    pub has_changes: bool,
    pub new_snapshot_bytes: Option<Vec<u8>>,
    pub new_state_id: Option<String>,
    pub diff_blob_bytes: Option<Vec<u8>>,
    pub diff_id: Option<String>,
    pub summary: Option<Summary>,
    pub reasons: Vec<String>,
}

enum Plan {
    ColdStart,
    Steady,
    QueryChanged { prior_query_signature: String },
}

pub struct Differ {
    fetcher: Arc<dyn FeatureFetcher>,
    codec: SnapshotCodec,
    supported: SupportedLeaves,
}

impl Differ {
    pub fn new(fetcher: Arc<dyn FeatureFetcher>) -> Self {
        Self {
            fetcher,
            codec: SnapshotCodec::new(MigrationRegistry::new()),
            supported: SupportedLeaves::default(),
        }
    }

    pub async fn run(&self, input: RunInput) -> Result<DiffResult> {
        let start = Instant::now();
        wsn_core::log_op_start!("differ_run", search_id = input.search_id.as_str());

        let result = self.run_inner(input).await;

        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => wsn_core::log_op_end!("differ_run", duration_ms = duration_ms),
            Err(e) => wsn_core::log_op_error!("differ_run", e.clone(), duration_ms = duration_ms),
        }
        result
    }

    async fn run_inner(&self, input: RunInput) -> Result<DiffResult> {
        // Phase 1: load prior context
        let prior_snapshot = match input.previous_state_bytes.as_deref() {
            None => None,
            Some(bytes) if bytes.is_empty() => None,
            Some(bytes) => Some(self.codec.decode(bytes)?),
        };

        // Phase 2: plan
        let plan = match &prior_snapshot {
            None => Plan::ColdStart,
            Some(snap) if snap.metadata.query_signature == input.query => Plan::Steady,
            Some(snap) => Plan::QueryChanged {
                prior_query_signature: snap.metadata.query_signature.clone(),
            },
        };

        // Phase 3: fetch
        let new_live = self.fetch_features(&input.query).await?;
        let new_features = self.to_canonical_map(new_live);

        let mut query_changed = false;
        let mut flush_failed = false;
        let target_for_diff: Option<BTreeMap<String, CanonicalFeature>> = match &plan {
            Plan::ColdStart => None,
            Plan::Steady => Some(new_features.clone()),
            Plan::QueryChanged {
                prior_query_signature,
            } => {
                query_changed = true;
                match self.fetch_features(prior_query_signature).await {
                    Ok(live) => Some(self.to_canonical_map(live)),
                    Err(_) => {
                        flush_failed = true;
                        None
                    }
                }
            }
        };

        // Phase 4 + 5: compare and reconcile
        let reconciled = match (&prior_snapshot, &target_for_diff) {
            (Some(snap), Some(target)) => {
                let unreconciled = compare(&snap.data.features, target);
                if unreconciled.removed.is_empty() {
                    ReconciledDelta {
                        added: unreconciled.added,
                        removed: unreconciled.removed,
                        modified: unreconciled.modified,
                        moves: Vec::new(),
                        splits: Vec::new(),
                    }
                } else {
                    reconcile(unreconciled, &OracleRef(self.fetcher.as_ref())).await?
                }
            }
            _ => ReconciledDelta::default(),
        };

        // Phase 6 + 7
        let mut reconciled = reconciled;
        sort_diff_lists(&mut reconciled);

        // Phase 8
        let cold_start = matches!(plan, Plan::ColdStart);
        let has_changes = query_changed || !reconciled.is_empty() || cold_start;

        // Phase 9
        if !has_changes {
            return Ok(DiffResult {
                has_changes: false,
                ..Default::default()
            });
        }

        // Phase 10
        let _ = flush_failed; // flush-failed is already folded into `reconciled` being empty
        let now = chrono::Utc::now();
        let new_state_id = Uuid::now_v7().to_string();
        let diff_id = Uuid::now_v7().to_string();

        let snapshot = new_snapshot(
            SnapshotMetadata {
                id: new_state_id.clone(),
                generated_at: now,
                search_id: input.search_id.clone(),
                query_signature: input.query.clone(),
                event_id: Some(input.event_id.clone()),
            },
            new_features,
        );
        let new_snapshot_bytes = self.codec.encode(&snapshot)?;

        let summary = summarize(&reconciled, query_changed);

        let diff_blob = new_diff_blob(
            DiffMetadata {
                id: diff_id.clone(),
                generated_at: now,
                search_id: input.search_id,
                event_id: input.event_id,
                previous_state_id: prior_snapshot.map(|s| s.metadata.id),
                new_state_id: new_state_id.clone(),
            },
            DiffData::from_reconciled(reconciled, query_changed),
        );
        let diff_blob_bytes = wsn_core::snapshot::encode_diff(&diff_blob)?;

        let reasons = summary
            .reasons
            .iter()
            .map(|r| serde_json::to_value(r).unwrap().as_str().unwrap().to_string())
            .collect::<Vec<_>>();

        Ok(DiffResult {
            has_changes: true,
            new_snapshot_bytes: Some(new_snapshot_bytes),
            new_state_id: Some(new_state_id),
            diff_blob_bytes: Some(diff_blob_bytes),
            diff_id: Some(diff_id),
            summary: Some(summary),
            reasons,
        })
    }

    async fn fetch_features(
        &self,
        query: &str,
    ) -> Result<Vec<wsn_core::model::convert::LiveFeatureRecord>> {
        self.fetcher.fetch_features(query).await.map_err(|e| {
            DifferError::new(ErrorKind::FetcherError)
                .with_op("fetch_features")
                .with_message(e.to_string())
        })
    }

    fn to_canonical_map(
        &self,
        live: Vec<wsn_core::model::convert::LiveFeatureRecord>,
    ) -> BTreeMap<String, CanonicalFeature> {
        live.into_iter()
            .map(|record| {
                let id = record.id.clone();
                (id, canonical_feature_from_live(record, self.supported))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use wsn_core::diff::{FeatureOracle, OracleOutcome};
    use wsn_core::model::convert::LiveFeatureRecord;

    struct StubFetcher {
        by_query: Mutex<std::collections::HashMap<String, Vec<LiveFeatureRecord>>>,
        oracle: Mutex<std::collections::HashMap<String, OracleOutcome>>,
        fail_queries: Mutex<std::collections::HashSet<String>>,
    }

    impl StubFetcher {
        fn new() -> Self {
            Self {
                by_query: Mutex::new(std::collections::HashMap::new()),
                oracle: Mutex::new(std::collections::HashMap::new()),
                fail_queries: Mutex::new(std::collections::HashSet::new()),
            }
        }

        fn set(&self, query: &str, records: Vec<LiveFeatureRecord>) {
            self.by_query.lock().unwrap().insert(query.to_string(), records);
        }

        fn fail_on(&self, query: &str) {
            self.fail_queries.lock().unwrap().insert(query.to_string());
        }
    }

    #[async_trait]
    impl FeatureOracle for StubFetcher {
        async fn get_feature(&self, id: &str) -> Result<OracleOutcome> {
            Ok(self
                .oracle
                .lock()
                .unwrap()
                .get(id)
                .cloned()
                .unwrap_or(OracleOutcome::DoesNotExist))
        }
    }

    #[async_trait]
    impl FeatureFetcher for StubFetcher {
        async fn fetch_features(&self, query: &str) -> Result<Vec<LiveFeatureRecord>> {
            if self.fail_queries.lock().unwrap().contains(query) {
                return Err(DifferError::new(ErrorKind::FetcherError).with_message("stub failure"));
            }
            Ok(self.by_query.lock().unwrap().get(query).cloned().unwrap_or_default())
        }
    }

    fn feature(id: &str, name: &str, status: wsn_core::model::BaselineStatus) -> LiveFeatureRecord {
        LiveFeatureRecord {
            id: id.to_string(),
            name: Some(name.to_string()),
            baseline_status: Some(status),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn cold_start_has_changes_with_empty_reasons() {
        let fetcher = Arc::new(StubFetcher::new());
        fetcher.set(
            "group:css",
            vec![feature("1", "Grid", wsn_core::model::BaselineStatus::Limited)],
        );
        let differ = Differ::new(fetcher);

        let result = differ
            .run(RunInput {
                search_id: "s1".to_string(),
                query: "group:css".to_string(),
                event_id: "e1".to_string(),
                previous_state_bytes: None,
            })
            .await
            .unwrap();

        assert!(result.has_changes);
        assert!(result.reasons.is_empty());
        assert!(result.new_snapshot_bytes.is_some());
    }

    #[tokio::test]
    async fn steady_no_op_has_no_changes() {
        let fetcher = Arc::new(StubFetcher::new());
        fetcher.set(
            "group:css",
            vec![feature("1", "Grid", wsn_core::model::BaselineStatus::Limited)],
        );
        let differ = Differ::new(fetcher);

        let first = differ
            .run(RunInput {
                search_id: "s1".to_string(),
                query: "group:css".to_string(),
                event_id: "e1".to_string(),
                previous_state_bytes: None,
            })
            .await
            .unwrap();

        let second = differ
            .run(RunInput {
                search_id: "s1".to_string(),
                query: "group:css".to_string(),
                event_id: "e2".to_string(),
                previous_state_bytes: first.new_snapshot_bytes,
            })
            .await
            .unwrap();

        assert!(!second.has_changes);
    }

    #[tokio::test]
    async fn data_update_produces_modified_entry() {
        let fetcher = Arc::new(StubFetcher::new());
        fetcher.set(
            "group:css",
            vec![feature("1", "Grid", wsn_core::model::BaselineStatus::Limited)],
        );
        let differ = Differ::new(fetcher.clone());

        let first = differ
            .run(RunInput {
                search_id: "s1".to_string(),
                query: "group:css".to_string(),
                event_id: "e1".to_string(),
                previous_state_bytes: None,
            })
            .await
            .unwrap();

        fetcher.set(
            "group:css",
            vec![feature("1", "Grid", wsn_core::model::BaselineStatus::Widely)],
        );

        let second = differ
            .run(RunInput {
                search_id: "s1".to_string(),
                query: "group:css".to_string(),
                event_id: "e2".to_string(),
                previous_state_bytes: first.new_snapshot_bytes,
            })
            .await
            .unwrap();

        assert!(second.has_changes);
        assert!(second.reasons.contains(&"DATA_UPDATED".to_string()));
    }

    #[tokio::test]
    async fn query_change_with_flush_failure_reports_only_query_edited() {
        let fetcher = Arc::new(StubFetcher::new());
        fetcher.set(
            "group:old",
            vec![feature("1", "Grid", wsn_core::model::BaselineStatus::Limited)],
        );
        let differ = Differ::new(fetcher.clone());

        let first = differ
            .run(RunInput {
                search_id: "s1".to_string(),
                query: "group:old".to_string(),
                event_id: "e1".to_string(),
                previous_state_bytes: None,
            })
            .await
            .unwrap();

        fetcher.set("group:new", vec![]);
        fetcher.fail_on("group:old");

        let second = differ
            .run(RunInput {
                search_id: "s1".to_string(),
                query: "group:new".to_string(),
                event_id: "e2".to_string(),
                previous_state_bytes: first.new_snapshot_bytes,
            })
            .await
            .unwrap();

        assert!(second.has_changes);
        assert_eq!(second.reasons, vec!["QUERY_EDITED".to_string()]);
    }

    #[tokio::test]
    async fn query_change_with_successful_flush_reports_both_reasons() {
        let fetcher = Arc::new(StubFetcher::new());
        fetcher.set(
            "group:old",
            vec![feature("1", "Grid", wsn_core::model::BaselineStatus::Limited)],
        );
        let differ = Differ::new(fetcher.clone());

        let first = differ
            .run(RunInput {
                search_id: "s1".to_string(),
                query: "group:old".to_string(),
                event_id: "e1".to_string(),
                previous_state_bytes: None,
            })
            .await
            .unwrap();

        fetcher.set("group:new", vec![]);
        fetcher.set(
            "group:old",
            vec![feature("1", "Grid", wsn_core::model::BaselineStatus::Widely)],
        );

        let second = differ
            .run(RunInput {
                search_id: "s1".to_string(),
                query: "group:new".to_string(),
                event_id: "e2".to_string(),
                previous_state_bytes: first.new_snapshot_bytes,
            })
            .await
            .unwrap();

        assert!(second.has_changes);
        let mut reasons = second.reasons.clone();
        reasons.sort();
        assert_eq!(reasons, vec!["DATA_UPDATED".to_string(), "QUERY_EDITED".to_string()]);

        // The stored snapshot reflects the new query's live result, not the
        // flush comparison target.
        let stored: wsn_core::snapshot::Snapshot = differ.codec.decode(&second.new_snapshot_bytes.unwrap()).unwrap();
        assert!(stored.data.features.is_empty());
    }

    #[tokio::test]
    async fn move_reconciliation_produces_move_entry() {
        let fetcher = Arc::new(StubFetcher::new());
        fetcher.set(
            "group:css",
            vec![feature("old-id", "Old Name", wsn_core::model::BaselineStatus::Limited)],
        );
        let differ = Differ::new(fetcher.clone());

        let first = differ
            .run(RunInput {
                search_id: "s1".to_string(),
                query: "group:css".to_string(),
                event_id: "e1".to_string(),
                previous_state_bytes: None,
            })
            .await
            .unwrap();

        fetcher.set(
            "group:css",
            vec![feature("new-id", "New Name", wsn_core::model::BaselineStatus::Limited)],
        );
        fetcher
            .oracle
            .lock()
            .unwrap()
            .insert("old-id".to_string(), OracleOutcome::Moved("new-id".to_string()));

        let second = differ
            .run(RunInput {
                search_id: "s1".to_string(),
                query: "group:css".to_string(),
                event_id: "e2".to_string(),
                previous_state_bytes: first.new_snapshot_bytes,
            })
            .await
            .unwrap();

        assert!(second.has_changes);
        assert!(second.reasons.contains(&"DATA_UPDATED".to_string()));
    }
}
