//! Diff output types
//!
//! All types implement `Debug, Clone, Serialize, Deserialize, PartialEq`.
//! Collections are plain `Vec`s; ordering is imposed later by
//! [`super::sorting`] rather than by the comparator or reconciler.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{Baseline, BrowserEntry, BrowserId, DocItem};

/// `{from, to}` pair for a single changed leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change<T> {
    pub from: T,
    pub to: T,
}

impl<T> Change<T> {
    pub fn new(from: T, to: T) -> Self {
        Self { from, to }
    }
}

/// Why an id showed up in `added`. Always `NewMatch` pre-reconciliation;
/// the reconciler consumes added entries into moves/splits rather than
/// relabeling this reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddReason {
    NewMatch,
}

/// Why an id showed up in `removed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoveReason {
    Unmatched,
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddedEntry {
    pub id: String,
    pub name: Option<String>,
    pub reason: AddReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs: Option<Vec<DocItem>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemovedEntry {
    pub id: String,
    pub name: Option<String>,
    pub reason: RemoveReason,
}

/// A resolved (non-tri-state) view of the baseline, used as the `from`/`to`
/// value of a [`Change`] in a modified entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BaselineValue {
    pub status: Option<crate::model::BaselineStatus>,
    pub low_date: Option<chrono::DateTime<chrono::Utc>>,
    pub high_date: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<&Baseline> for BaselineValue {
    fn from(b: &Baseline) -> Self {
        Self {
            status: b.status.value().copied(),
            low_date: b.low_date.value().copied(),
            high_date: b.high_date.value().copied(),
        }
    }
}

/// Resolved view of a single browser's implementation entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BrowserEntryValue {
    pub status: Option<crate::model::BrowserAvailability>,
    pub version: Option<String>,
    pub date: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<&BrowserEntry> for BrowserEntryValue {
    fn from(e: &BrowserEntry) -> Self {
        Self {
            status: e.status.value().copied(),
            version: e.version.value().cloned(),
            date: e.date.value().copied(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifiedEntry {
    pub id: String,
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_change: Option<Change<Option<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline_change: Option<Change<BaselineValue>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub browser_changes: BTreeMap<BrowserId, Change<BrowserEntryValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs_change: Option<Change<Vec<DocItem>>>,
}

impl ModifiedEntry {
    pub fn is_empty(&self) -> bool {
        self.name_change.is_none()
            && self.baseline_change.is_none()
            && self.browser_changes.is_empty()
            && self.docs_change.is_none()
    }

    pub fn has_browser_change(&self) -> bool {
        !self.browser_changes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveEntry {
    pub from_id: String,
    pub to_id: String,
    pub from_name: Option<String>,
    pub to_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitEntry {
    pub from_id: String,
    pub from_name: Option<String>,
    pub to: Vec<AddedEntry>,
}

/// The comparator's raw output: add/remove/modify only, not yet
/// reconciled into moves and splits, and not yet sorted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnreconciledDelta {
    pub added: Vec<AddedEntry>,
    pub removed: Vec<RemovedEntry>,
    pub modified: Vec<ModifiedEntry>,
}

impl UnreconciledDelta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }
}

/// The reconciler's output: the final, reconciled but not-yet-sorted diff.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconciledDelta {
    pub added: Vec<AddedEntry>,
    pub removed: Vec<RemovedEntry>,
    pub modified: Vec<ModifiedEntry>,
    pub moves: Vec<MoveEntry>,
    pub splits: Vec<SplitEntry>,
}

impl ReconciledDelta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.removed.is_empty()
            && self.modified.is_empty()
            && self.moves.is_empty()
            && self.splits.is_empty()
    }
}
