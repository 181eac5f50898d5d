//! Property tests for the comparator's core invariants (reflexivity and
//! added/removed disjointness) and for `Optional<T>`'s round-trip
//! behaviour, backed by `proptest` the way the teacher workspace carries
//! it as a dev-dependency without an examined consumer.

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;
use serde::{Deserialize, Serialize};

use wsn_core::diff::compare;
use wsn_core::model::{CanonicalFeature, Optional};

fn feature_id() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

fn feature_map(ids: &BTreeSet<String>) -> BTreeMap<String, CanonicalFeature> {
    ids.iter().map(|id| (id.clone(), CanonicalFeature::bare(id))).collect()
}

proptest! {
    #[test]
    fn compare_of_a_map_against_itself_is_always_empty(ids in prop::collection::btree_set(feature_id(), 0..20)) {
        let map = feature_map(&ids);
        let delta = compare(&map, &map);
        prop_assert!(delta.added.is_empty());
        prop_assert!(delta.removed.is_empty());
        prop_assert!(delta.modified.is_empty());
    }

    #[test]
    fn added_and_removed_ids_are_always_disjoint(
        old_ids in prop::collection::btree_set(feature_id(), 0..20),
        new_ids in prop::collection::btree_set(feature_id(), 0..20),
    ) {
        let old = feature_map(&old_ids);
        let new = feature_map(&new_ids);
        let delta = compare(&old, &new);

        let added_ids: BTreeSet<_> = delta.added.iter().map(|e| e.id.clone()).collect();
        let removed_ids: BTreeSet<_> = delta.removed.iter().map(|e| e.id.clone()).collect();
        prop_assert!(added_ids.is_disjoint(&removed_ids));

        let expected_added: BTreeSet<_> = new_ids.difference(&old_ids).cloned().collect();
        let expected_removed: BTreeSet<_> = old_ids.difference(&new_ids).cloned().collect();
        prop_assert_eq!(added_ids, expected_added);
        prop_assert_eq!(removed_ids, expected_removed);
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct OptionalWrapper {
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    name: Optional<String>,
}

fn optional_string() -> impl Strategy<Value = Optional<String>> {
    prop_oneof![
        Just(Optional::absent()),
        Just(Optional::present_null()),
        "[a-zA-Z0-9 ]{0,16}".prop_map(Optional::present),
    ]
}

proptest! {
    #[test]
    fn optional_round_trips_through_json_when_wrapped_with_skip_if_absent(value in optional_string()) {
        let wrapper = OptionalWrapper { name: value };
        let json = serde_json::to_string(&wrapper).unwrap();
        let back: OptionalWrapper = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, wrapper);
    }
}
