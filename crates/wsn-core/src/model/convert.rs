//! Conversion from a fetched live-data record into the canonical feature
//!
//! The live record is whatever [`crate::ports::FeatureFetcher`] hands back;
//! decoding its wire format is out of scope here (see the fetcher contract).
//! This module only owns the mapping from "what the source provides" to
//! tri-state canonical leaves.

use std::collections::BTreeMap;

use super::baseline::{Baseline, BaselineStatus};
use super::browser::{BrowserAvailability, BrowserEntry, BrowserId};
use super::docs::{DocItem, Docs};
use super::feature::CanonicalFeature;
use super::optional::Optional;

/// A single browser's live status, as handed back by the fetcher.
#[derive(Debug, Clone, Default)]
pub struct LiveBrowserEntry {
    pub status: Option<BrowserAvailability>,
    pub version: Option<String>,
    pub date: Option<chrono::DateTime<chrono::Utc>>,
}

/// A single live doc link.
#[derive(Debug, Clone, Default)]
pub struct LiveDocItem {
    pub url: Option<String>,
    pub title: Option<String>,
    pub slug: Option<String>,
}

/// The live-data shape produced by the external feature source. Every field
/// here is something the source is known to support in this API version;
/// fields the source genuinely cannot produce are simply left out of this
/// struct's construction (callers wrap them as absent before building).
#[derive(Debug, Clone, Default)]
pub struct LiveFeatureRecord {
    pub id: String,
    pub name: Option<String>,
    pub baseline_status: Option<BaselineStatus>,
    pub baseline_low_date: Option<chrono::DateTime<chrono::Utc>>,
    pub baseline_high_date: Option<chrono::DateTime<chrono::Utc>>,
    pub browser_impls: Option<BTreeMap<BrowserId, LiveBrowserEntry>>,
    pub docs: Option<Vec<LiveDocItem>>,
}

/// Which leaves this fetcher's API version supports. Fields not listed here
/// stay `Optional::absent()` on the resulting canonical feature regardless
/// of what the live record carries, implementing "fields the source cannot
/// produce remain absent".
#[derive(Debug, Clone, Copy)]
pub struct SupportedLeaves {
    pub name: bool,
    pub baseline: bool,
    pub browser_impls: bool,
    pub docs: bool,
}

impl Default for SupportedLeaves {
    fn default() -> Self {
        Self {
            name: true,
            baseline: true,
            browser_impls: true,
            docs: true,
        }
    }
}

/// Build a [`CanonicalFeature`] from a live record, honoring which leaves
/// this source version supports.
pub fn canonical_feature_from_live(
    record: LiveFeatureRecord,
    supported: SupportedLeaves,
) -> CanonicalFeature {
    let name = if supported.name {
        Optional::Present(record.name)
    } else {
        Optional::absent()
    };

    let baseline = if supported.baseline {
        Optional::present(Baseline {
            status: Optional::Present(record.baseline_status),
            low_date: Optional::Present(record.baseline_low_date),
            high_date: Optional::Present(record.baseline_high_date),
        })
    } else {
        Optional::absent()
    };

    let browser_impls = if supported.browser_impls {
        let map = record
            .browser_impls
            .unwrap_or_default()
            .into_iter()
            .map(|(id, entry)| {
                (
                    id,
                    BrowserEntry {
                        status: Optional::Present(entry.status),
                        version: Optional::Present(entry.version),
                        date: Optional::Present(entry.date),
                    },
                )
            })
            .collect::<BTreeMap<_, _>>();
        Optional::present(map)
    } else {
        Optional::absent()
    };

    let docs = if supported.docs {
        let list = record.docs.map(|items| {
            items
                .into_iter()
                .map(|item| DocItem {
                    url: Optional::Present(item.url),
                    title: Optional::Present(item.title),
                    slug: Optional::Present(item.slug),
                })
                .collect::<Vec<_>>()
        });
        Optional::present(Docs {
            list: Optional::Present(list),
        })
    } else {
        Optional::absent()
    };

    CanonicalFeature {
        id: record.id,
        name,
        baseline,
        browser_impls,
        docs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_leaf_stays_absent_regardless_of_record_content() {
        let record = LiveFeatureRecord {
            id: "1".to_string(),
            name: Some("Grid".to_string()),
            ..Default::default()
        };
        let supported = SupportedLeaves {
            docs: false,
            ..Default::default()
        };
        let feature = canonical_feature_from_live(record, supported);
        assert!(feature.docs.is_absent());
        assert_eq!(feature.name.value().map(String::as_str), Some("Grid"));
    }

    #[test]
    fn supported_leaf_with_none_value_is_present_null() {
        let record = LiveFeatureRecord {
            id: "1".to_string(),
            name: None,
            ..Default::default()
        };
        let feature = canonical_feature_from_live(record, SupportedLeaves::default());
        assert!(feature.name.is_present());
        assert_eq!(feature.name.value(), None);
    }
}
