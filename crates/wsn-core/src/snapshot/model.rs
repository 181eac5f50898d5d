//! Wire shapes for the snapshot and diff blobs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::diff::{AddedEntry, ModifiedEntry, MoveEntry, ReconciledDelta, RemovedEntry, SplitEntry};
use crate::model::CanonicalFeature;

use super::envelope::Envelope;
use super::version::{CURRENT_DIFF_VERSION, CURRENT_SNAPSHOT_VERSION, KIND_DIFF, KIND_SNAPSHOT};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub id: String,
    #[serde(rename = "generatedAt")]
    pub generated_at: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "searchId")]
    pub search_id: String,
    #[serde(rename = "querySignature")]
    pub query_signature: String,
    #[serde(rename = "eventId", skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SnapshotData {
    pub features: BTreeMap<String, CanonicalFeature>,
}

pub type Snapshot = Envelope<SnapshotMetadata, SnapshotData>;

pub fn new_snapshot(metadata: SnapshotMetadata, features: BTreeMap<String, CanonicalFeature>) -> Snapshot {
    Envelope::new(
        KIND_SNAPSHOT,
        CURRENT_SNAPSHOT_VERSION,
        metadata,
        SnapshotData { features },
    )
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffMetadata {
    pub id: String,
    #[serde(rename = "generatedAt")]
    pub generated_at: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "searchId")]
    pub search_id: String,
    #[serde(rename = "eventId")]
    pub event_id: String,
    #[serde(rename = "previousStateId", skip_serializing_if = "Option::is_none")]
    pub previous_state_id: Option<String>,
    #[serde(rename = "newStateId")]
    pub new_state_id: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DiffData {
    #[serde(rename = "queryChanged")]
    pub query_changed: bool,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub added: Vec<AddedEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub removed: Vec<RemovedEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub modified: Vec<ModifiedEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub moves: Vec<MoveEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub splits: Vec<SplitEntry>,
}

impl DiffData {
    pub fn from_reconciled(delta: ReconciledDelta, query_changed: bool) -> Self {
        Self {
            query_changed,
            added: delta.added,
            removed: delta.removed,
            modified: delta.modified,
            moves: delta.moves,
            splits: delta.splits,
        }
    }
}

pub type DiffBlob = Envelope<DiffMetadata, DiffData>;

pub fn new_diff_blob(metadata: DiffMetadata, data: DiffData) -> DiffBlob {
    Envelope::new(KIND_DIFF, CURRENT_DIFF_VERSION, metadata, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_diff_lists_are_omitted_from_encoding() {
        let blob = new_diff_blob(
            DiffMetadata {
                id: "diff-1".to_string(),
                generated_at: chrono::Utc::now(),
                search_id: "s1".to_string(),
                event_id: "e1".to_string(),
                previous_state_id: Some("prev".to_string()),
                new_state_id: "new".to_string(),
            },
            DiffData {
                query_changed: true,
                ..Default::default()
            },
        );
        let json = serde_json::to_value(&blob).unwrap();
        let data = &json["data"];
        assert!(data.get("added").is_none());
        assert!(data.get("removed").is_none());
        assert_eq!(data["queryChanged"], true);
    }
}
