//! The feature data source contract

use async_trait::async_trait;

use crate::diff::FeatureOracle;
use crate::errors::Result;
use crate::model::LiveFeatureRecord;

/// External collaborator providing live feature data. Its `get_feature`
/// capability (inherited from [`FeatureOracle`]) doubles as the history
/// oracle the reconciler consults. Implementations are out of scope for the
/// core: the feature-data REST API and its OpenAPI codegen live behind this
/// trait.
#[async_trait]
pub trait FeatureFetcher: FeatureOracle {
    /// Features currently matching `query`.
    async fn fetch_features(&self, query: &str) -> Result<Vec<LiveFeatureRecord>>;
}
