pub mod baseline;
pub mod browser;
pub mod convert;
pub mod docs;
pub mod feature;
pub mod optional;

pub use baseline::{Baseline, BaselineStatus};
pub use browser::{BrowserAvailability, BrowserEntry, BrowserId};
pub use convert::{canonical_feature_from_live, LiveBrowserEntry, LiveDocItem, LiveFeatureRecord, SupportedLeaves};
pub use docs::{sorted_docs_list, DocItem, Docs};
pub use feature::CanonicalFeature;
pub use optional::Optional;
