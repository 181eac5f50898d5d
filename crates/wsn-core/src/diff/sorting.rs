//! Deterministic ordering of diff lists
//!
//! Every diff list is sorted by `(name, id)` ascending; split targets are
//! sorted the same way within each split.

use super::model::ReconciledDelta;

fn name_id_key(name: &Option<String>, id: &str) -> (String, String) {
    (name.clone().unwrap_or_default(), id.to_string())
}

/// Sort every list of a reconciled delta in place, per the `(name, id)` rule.
pub fn sort_diff_lists(delta: &mut ReconciledDelta) {
    delta
        .added
        .sort_by(|a, b| name_id_key(&a.name, &a.id).cmp(&name_id_key(&b.name, &b.id)));
    delta
        .removed
        .sort_by(|a, b| name_id_key(&a.name, &a.id).cmp(&name_id_key(&b.name, &b.id)));
    delta
        .modified
        .sort_by(|a, b| name_id_key(&a.name, &a.id).cmp(&name_id_key(&b.name, &b.id)));
    delta.moves.sort_by(|a, b| {
        name_id_key(&a.from_name, &a.from_id).cmp(&name_id_key(&b.from_name, &b.from_id))
    });
    for split in &mut delta.splits {
        split
            .to
            .sort_by(|a, b| name_id_key(&a.name, &a.id).cmp(&name_id_key(&b.name, &b.id)));
    }
    delta.splits.sort_by(|a, b| {
        name_id_key(&a.from_name, &a.from_id).cmp(&name_id_key(&b.from_name, &b.from_id))
    });
}
