//! HTTP-backed [`FeatureFetcher`]
//!
//! Talks to a configurable base URL's `/v1/features?q=` (search) and
//! `/v1/features/{id}` (oracle lookup) endpoints. The OpenAPI codec for
//! that API is out of scope; this is a minimal, tolerant hand-rolled
//! decoder — every wire field is `#[serde(default)]` so a source that
//! omits a leaf degrades to `None` rather than a parse failure.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Deserialize;

use wsn_core::diff::{FeatureOracle, OracleOutcome};
use wsn_core::errors::Result;
use wsn_core::model::browser::{BrowserAvailability, BrowserId};
use wsn_core::model::baseline::BaselineStatus;
use wsn_core::model::convert::{LiveBrowserEntry, LiveDocItem, LiveFeatureRecord};
use wsn_core::ports::FeatureFetcher;

use crate::errors::from_reqwest;

#[derive(Debug, Default, Deserialize)]
struct WireBrowserEntry {
    #[serde(default)]
    status: Option<BrowserAvailability>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    date: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Default, Deserialize)]
struct WireDocItem {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    slug: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WireFeature {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    baseline_status: Option<BaselineStatus>,
    #[serde(default)]
    baseline_low_date: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    baseline_high_date: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    browser_impls: Option<BTreeMap<BrowserId, WireBrowserEntry>>,
    #[serde(default)]
    docs: Option<Vec<WireDocItem>>,
}

impl From<WireFeature> for LiveFeatureRecord {
    fn from(w: WireFeature) -> Self {
        LiveFeatureRecord {
            id: w.id,
            name: w.name,
            baseline_status: w.baseline_status,
            baseline_low_date: w.baseline_low_date,
            baseline_high_date: w.baseline_high_date,
            browser_impls: w.browser_impls.map(|map| {
                map.into_iter()
                    .map(|(id, entry)| {
                        (
                            id,
                            LiveBrowserEntry {
                                status: entry.status,
                                version: entry.version,
                                date: entry.date,
                            },
                        )
                    })
                    .collect()
            }),
            docs: w.docs.map(|items| {
                items
                    .into_iter()
                    .map(|item| LiveDocItem {
                        url: item.url,
                        title: item.title,
                        slug: item.slug,
                    })
                    .collect()
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireSearchResponse {
    #[serde(default)]
    features: Vec<WireFeature>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum WireOracleResponse {
    Regular,
    Moved { to_id: String },
    Split { to_ids: Vec<String> },
    DoesNotExist,
}

impl From<WireOracleResponse> for OracleOutcome {
    fn from(w: WireOracleResponse) -> Self {
        match w {
            WireOracleResponse::Regular => OracleOutcome::Regular,
            WireOracleResponse::Moved { to_id } => OracleOutcome::Moved(to_id),
            WireOracleResponse::Split { to_ids } => OracleOutcome::Split(to_ids),
            WireOracleResponse::DoesNotExist => OracleOutcome::DoesNotExist,
        }
    }
}

pub struct HttpFeatureFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFeatureFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl FeatureOracle for HttpFeatureFetcher {
    async fn get_feature(&self, id: &str) -> Result<OracleOutcome> {
        let url = format!("{}/v1/features/{id}", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| from_reqwest("get_feature_send", e))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(OracleOutcome::DoesNotExist);
        }

        let response = response
            .error_for_status()
            .map_err(|e| from_reqwest("get_feature_status", e))?;

        let wire: WireOracleResponse = response
            .json()
            .await
            .map_err(|e| from_reqwest("get_feature_decode", e))?;

        Ok(wire.into())
    }
}

#[async_trait]
impl FeatureFetcher for HttpFeatureFetcher {
    async fn fetch_features(&self, query: &str) -> Result<Vec<LiveFeatureRecord>> {
        let url = format!("{}/v1/features", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|e| from_reqwest("fetch_features_send", e))?
            .error_for_status()
            .map_err(|e| from_reqwest("fetch_features_status", e))?;

        let wire: WireSearchResponse = response
            .json()
            .await
            .map_err(|e| from_reqwest("fetch_features_decode", e))?;

        Ok(wire.features.into_iter().map(LiveFeatureRecord::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_feature_with_missing_leaves_degrades_to_none() {
        let wire: WireFeature = serde_json::from_str(r#"{"id":"1"}"#).unwrap();
        let live = LiveFeatureRecord::from(wire);
        assert_eq!(live.id, "1");
        assert_eq!(live.name, None);
        assert!(live.docs.is_none());
    }

    #[test]
    fn wire_oracle_response_tags_on_status() {
        let wire: WireOracleResponse =
            serde_json::from_str(r#"{"status":"moved","to_id":"2"}"#).unwrap();
        let outcome: OracleOutcome = wire.into();
        assert_eq!(outcome, OracleOutcome::Moved("2".to_string()));
    }
}
