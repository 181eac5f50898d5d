//! Baseline composite: the web-platform-wide availability status of a feature

use serde::{Deserialize, Serialize};

use super::optional::Optional;

/// Cross-browser baseline status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineStatus {
    Limited,
    Newly,
    Widely,
    Unknown,
}

/// Tri-state baseline composite: status plus the low/high dates that bound it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Baseline {
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub status: Optional<BaselineStatus>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub low_date: Optional<chrono::DateTime<chrono::Utc>>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub high_date: Optional<chrono::DateTime<chrono::Utc>>,
}

impl Baseline {
    pub fn is_empty(&self) -> bool {
        self.status.is_absent() && self.low_date.is_absent() && self.high_date.is_absent()
    }
}
