//! The canonical feature: the unit of comparison for the differ

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::baseline::Baseline;
use super::browser::{BrowserEntry, BrowserId};
use super::docs::Docs;
use super::optional::Optional;

/// Immutable in-memory representation of a feature, with tri-state
/// optionality on every evolvable attribute.
///
/// `id` is the only non-optional field: it is the identity used throughout
/// the comparator, reconciler, and oracle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalFeature {
    pub id: String,

    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub name: Optional<String>,

    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub baseline: Optional<Baseline>,

    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub browser_impls: Optional<BTreeMap<BrowserId, BrowserEntry>>,

    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub docs: Optional<Docs>,
}

impl CanonicalFeature {
    /// A feature with only an id set; every other leaf absent.
    pub fn bare(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Optional::absent(),
            baseline: Optional::absent(),
            browser_impls: Optional::absent(),
            docs: Optional::absent(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_feature_omits_every_optional_leaf() {
        let f = CanonicalFeature::bare("1");
        let json = serde_json::to_value(&f).unwrap();
        assert_eq!(json, serde_json::json!({"id": "1"}));
    }

    #[test]
    fn round_trips_through_json() {
        let mut browsers = BTreeMap::new();
        browsers.insert(
            BrowserId::Chrome,
            super::super::browser::BrowserEntry {
                status: Optional::present(super::super::browser::BrowserAvailability::Available),
                version: Optional::present("100".to_string()),
                date: Optional::absent(),
            },
        );
        let f = CanonicalFeature {
            id: "grid".to_string(),
            name: Optional::present("Grid".to_string()),
            baseline: Optional::present(Baseline {
                status: Optional::present(super::super::baseline::BaselineStatus::Widely),
                ..Default::default()
            }),
            browser_impls: Optional::present(browsers),
            docs: Optional::absent(),
        };
        let json = serde_json::to_string(&f).unwrap();
        let back: CanonicalFeature = serde_json::from_str(&json).unwrap();
        assert_eq!(back, f);
    }
}
