//! Pure comparison between two canonical feature maps
//!
//! `compare` never consults external state and never sorts its output;
//! sorting is the orchestrator's job (see [`super::sorting`]).

use std::collections::BTreeMap;

use crate::model::{sorted_docs_list, CanonicalFeature};

use super::model::{
    AddReason, AddedEntry, BaselineValue, BrowserEntryValue, Change, ModifiedEntry, RemoveReason,
    RemovedEntry, UnreconciledDelta,
};

/// Compare `old` against `new`, producing added/removed/modified entries.
///
/// Implements the quiet-rollout rule: a leaf only contributes a change entry
/// when the *old* side has that leaf present. An absent old leaf can never
/// produce a false-positive diff, no matter what the new side carries.
pub fn compare(
    old: &BTreeMap<String, CanonicalFeature>,
    new: &BTreeMap<String, CanonicalFeature>,
) -> UnreconciledDelta {
    let mut added = Vec::new();
    let mut removed = Vec::new();
    let mut modified = Vec::new();

    for (id, new_feature) in new {
        if !old.contains_key(id) {
            added.push(AddedEntry {
                id: id.clone(),
                name: new_feature.name.value().cloned(),
                reason: AddReason::NewMatch,
                docs: new_feature
                    .docs
                    .value()
                    .and_then(|d| d.list.value())
                    .cloned(),
            });
        }
    }

    for (id, old_feature) in old {
        if !new.contains_key(id) {
            removed.push(RemovedEntry {
                id: id.clone(),
                name: old_feature.name.value().cloned(),
                reason: RemoveReason::Unmatched,
            });
        }
    }

    for (id, new_feature) in new {
        let Some(old_feature) = old.get(id) else {
            continue;
        };
        if let Some(entry) = compare_feature(id, old_feature, new_feature) {
            modified.push(entry);
        }
    }

    UnreconciledDelta {
        added,
        removed,
        modified,
    }
}

fn compare_feature(
    id: &str,
    old: &CanonicalFeature,
    new: &CanonicalFeature,
) -> Option<ModifiedEntry> {
    let name_change = if old.name.is_present() && old.name.value() != new.name.value() {
        Some(Change::new(
            old.name.value().cloned(),
            new.name.value().cloned(),
        ))
    } else {
        None
    };

    let baseline_change = match (old.baseline.value(), new.baseline.value()) {
        (Some(old_b), _) if old_b.status.is_present() => {
            let new_b = new.baseline.value();
            let old_value = BaselineValue::from(old_b);
            let new_value = new_b.map(BaselineValue::from).unwrap_or_default();
            if old_value != new_value {
                Some(Change::new(old_value, new_value))
            } else {
                None
            }
        }
        _ => None,
    };

    let mut browser_changes = std::collections::BTreeMap::new();
    if let Some(old_browsers) = old.browser_impls.value() {
        let empty = std::collections::BTreeMap::new();
        let new_browsers = new.browser_impls.value().unwrap_or(&empty);
        for (browser_id, old_entry) in old_browsers {
            if old_entry.is_empty() {
                continue;
            }
            let new_entry = new_browsers.get(browser_id).cloned().unwrap_or_default();
            let old_value = BrowserEntryValue::from(old_entry);
            let new_value = BrowserEntryValue::from(&new_entry);
            if old_value != new_value {
                browser_changes.insert(*browser_id, Change::new(old_value, new_value));
            }
        }
    }

    let docs_change = match old.docs.value().and_then(|d| d.list.value()) {
        Some(old_list) => {
            let empty = Vec::new();
            let new_list = new
                .docs
                .value()
                .and_then(|d| d.list.value())
                .unwrap_or(&empty);
            let old_sorted = sorted_docs_list(old_list);
            let new_sorted = sorted_docs_list(new_list);
            if old_sorted != new_sorted {
                Some(Change::new(old_sorted, new_sorted))
            } else {
                None
            }
        }
        None => None,
    };

    let entry = ModifiedEntry {
        id: id.to_string(),
        name: new.name.value().cloned(),
        name_change,
        baseline_change,
        browser_changes,
        docs_change,
    };

    if entry.is_empty() {
        None
    } else {
        Some(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Baseline, BaselineStatus, Optional};

    fn feature(id: &str) -> CanonicalFeature {
        CanonicalFeature::bare(id)
    }

    #[test]
    fn reflexivity_compare_with_self_is_empty() {
        let mut map = BTreeMap::new();
        let mut f = feature("1");
        f.name = Optional::present("Grid".to_string());
        f.baseline = Optional::present(Baseline {
            status: Optional::present(BaselineStatus::Limited),
            ..Default::default()
        });
        map.insert("1".to_string(), f);

        let delta = compare(&map, &map);
        assert!(delta.is_empty());
    }

    #[test]
    fn quiet_rollout_suppresses_change_when_old_field_absent() {
        let mut old_map = BTreeMap::new();
        old_map.insert("1".to_string(), feature("1"));

        let mut new_feature = feature("1");
        new_feature.baseline = Optional::present(Baseline {
            status: Optional::present(BaselineStatus::Widely),
            ..Default::default()
        });
        let mut new_map = BTreeMap::new();
        new_map.insert("1".to_string(), new_feature);

        let delta = compare(&old_map, &new_map);
        assert!(delta.modified.is_empty());
    }

    #[test]
    fn disjointness_added_and_removed_never_share_ids() {
        let mut old_map = BTreeMap::new();
        old_map.insert("a".to_string(), feature("a"));
        let mut new_map = BTreeMap::new();
        new_map.insert("b".to_string(), feature("b"));

        let delta = compare(&old_map, &new_map);
        let added_ids: std::collections::HashSet<_> = delta.added.iter().map(|e| &e.id).collect();
        let removed_ids: std::collections::HashSet<_> =
            delta.removed.iter().map(|e| &e.id).collect();
        assert!(added_ids.is_disjoint(&removed_ids));
    }

    #[test]
    fn baseline_change_detected_when_old_present() {
        let mut old_feature = feature("1");
        old_feature.baseline = Optional::present(Baseline {
            status: Optional::present(BaselineStatus::Limited),
            ..Default::default()
        });
        let mut new_feature = feature("1");
        new_feature.baseline = Optional::present(Baseline {
            status: Optional::present(BaselineStatus::Widely),
            ..Default::default()
        });

        let mut old_map = BTreeMap::new();
        old_map.insert("1".to_string(), old_feature);
        let mut new_map = BTreeMap::new();
        new_map.insert("1".to_string(), new_feature);

        let delta = compare(&old_map, &new_map);
        assert_eq!(delta.modified.len(), 1);
        assert!(delta.modified[0].baseline_change.is_some());
    }
}
