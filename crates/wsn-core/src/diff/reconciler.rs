//! History reconciler: collapses naive add/remove pairs into moves and splits
//!
//! Consults a [`FeatureOracle`] for each removed id. The oracle's answer
//! determines whether the id is relabeled `deleted`, correlated into a
//! `Move`, correlated into a `Split`, or left as a plain `removed/unmatched`
//! entry.

use async_trait::async_trait;

use crate::errors::Result;

use super::model::{MoveEntry, RemoveReason, ReconciledDelta, SplitEntry, UnreconciledDelta};

/// What happened to a historical feature id, per the oracle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OracleOutcome {
    /// The id still exists as a regular, unrelated feature.
    Regular,
    /// The id was renamed to `newId`.
    Moved(String),
    /// The id was split into the given new ids.
    Split(Vec<String>),
    /// The id no longer exists in any form.
    DoesNotExist,
}

/// The authoritative "what happened to this feature id" capability.
///
/// Implemented by the same adapter that backs [`crate::ports::FeatureFetcher`]
/// — `GetFeature` doubles as the history oracle.
#[async_trait]
pub trait FeatureOracle: Send + Sync {
    async fn get_feature(&self, id: &str) -> Result<OracleOutcome>;
}

/// Reconcile an [`UnreconciledDelta`] against the oracle, producing the
/// final (but not yet sorted) diff.
pub async fn reconcile(
    delta: UnreconciledDelta,
    oracle: &dyn FeatureOracle,
) -> Result<ReconciledDelta> {
    let UnreconciledDelta {
        mut added,
        removed,
        modified,
    } = delta;

    let mut final_removed = Vec::new();
    let mut moves = Vec::new();
    let mut splits = Vec::new();

    for entry in removed {
        match oracle.get_feature(&entry.id).await? {
            OracleOutcome::DoesNotExist => {
                final_removed.push(super::model::RemovedEntry {
                    reason: RemoveReason::Deleted,
                    ..entry
                });
            }
            OracleOutcome::Regular => {
                final_removed.push(entry);
            }
            OracleOutcome::Moved(new_id) => {
                if let Some(pos) = added.iter().position(|a| a.id == new_id) {
                    let target = added.remove(pos);
                    moves.push(MoveEntry {
                        from_id: entry.id,
                        to_id: target.id,
                        from_name: entry.name,
                        to_name: target.name,
                    });
                } else {
                    final_removed.push(entry);
                }
            }
            OracleOutcome::Split(new_ids) => {
                let mut matched = Vec::new();
                for new_id in &new_ids {
                    if let Some(pos) = added.iter().position(|a| &a.id == new_id) {
                        matched.push(added.remove(pos));
                    }
                }
                if matched.is_empty() {
                    final_removed.push(entry);
                } else {
                    splits.push(SplitEntry {
                        from_id: entry.id,
                        from_name: entry.name,
                        to: matched,
                    });
                }
            }
        }
    }

    Ok(ReconciledDelta {
        added,
        removed: final_removed,
        modified,
        moves,
        splits,
    })
}
