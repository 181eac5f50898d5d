//! Browser enum and per-browser implementation status

use serde::{Deserialize, Serialize};

use super::optional::Optional;

/// Fixed enum of browsers tracked by the canonical feature model.
///
/// Membership is stable across schema versions; adding a member is a
/// quiet-rollout event, never a false "added" diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrowserId {
    Chrome,
    ChromeAndroid,
    Edge,
    Firefox,
    FirefoxAndroid,
    Safari,
    SafariIos,
}

impl BrowserId {
    pub const ALL: [BrowserId; 7] = [
        BrowserId::Chrome,
        BrowserId::ChromeAndroid,
        BrowserId::Edge,
        BrowserId::Firefox,
        BrowserId::FirefoxAndroid,
        BrowserId::Safari,
        BrowserId::SafariIos,
    ];
}

/// Availability status of a feature in a single browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrowserAvailability {
    Available,
    Unavailable,
    Unknown,
}

/// Per-browser tri-state leaves: status, version, and the date of that status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BrowserEntry {
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub status: Optional<BrowserAvailability>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub version: Optional<String>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub date: Optional<chrono::DateTime<chrono::Utc>>,
}

impl BrowserEntry {
    pub fn is_empty(&self) -> bool {
        self.status.is_absent() && self.version.is_absent() && self.date.is_absent()
    }
}
