//! Human summary, categorical counters, and reason tags for a diff

use serde::{Deserialize, Serialize};

use super::model::ReconciledDelta;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Reason {
    QueryEdited,
    DataUpdated,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub query_changed: u32,
    pub added: u32,
    pub removed: u32,
    pub moved: u32,
    pub split: u32,
    pub updated: u32,
    pub updated_impl: u32,
    pub updated_rename: u32,
    pub updated_baseline: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub counters: Counters,
    pub text: String,
    pub reasons: Vec<Reason>,
}

/// Compute the summary for a reconciled, sorted delta.
///
/// `query_changed` is passed separately because it is a property of the run
/// plan, not of the delta itself.
pub fn summarize(delta: &ReconciledDelta, query_changed: bool) -> Summary {
    let updated_impl = delta
        .modified
        .iter()
        .filter(|m| m.has_browser_change())
        .count() as u32;
    let updated_rename = delta
        .modified
        .iter()
        .filter(|m| m.name_change.is_some())
        .count() as u32;
    let updated_baseline = delta
        .modified
        .iter()
        .filter(|m| m.baseline_change.is_some())
        .count() as u32;

    let counters = Counters {
        query_changed: query_changed as u32,
        added: delta.added.len() as u32,
        removed: delta.removed.len() as u32,
        moved: delta.moves.len() as u32,
        split: delta.splits.len() as u32,
        updated: delta.modified.len() as u32,
        updated_impl,
        updated_rename,
        updated_baseline,
    };

    let mut parts = Vec::new();
    if counters.query_changed > 0 {
        parts.push("Search criteria updated".to_string());
    }
    if counters.added > 0 {
        parts.push(format!("{} features added", counters.added));
    }
    if counters.removed > 0 {
        parts.push(format!("{} features removed", counters.removed));
    }
    if counters.moved > 0 {
        parts.push(format!("{} features moved/renamed", counters.moved));
    }
    if counters.split > 0 {
        parts.push(format!("{} features split", counters.split));
    }
    if counters.updated > 0 {
        parts.push(format!("{} features updated", counters.updated));
    }

    let text = if parts.is_empty() {
        "No changes detected".to_string()
    } else {
        parts.join(", ")
    };

    let mut reasons = Vec::new();
    if query_changed {
        reasons.push(Reason::QueryEdited);
    }
    if counters.added > 0
        || counters.removed > 0
        || counters.moved > 0
        || counters.split > 0
        || counters.updated > 0
    {
        reasons.push(Reason::DataUpdated);
    }

    Summary {
        counters,
        text,
        reasons,
    }
}
