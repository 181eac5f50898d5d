//! Process-wide configuration
//!
//! Loaded through the `config` crate (layered file + environment) with
//! `dotenvy` populating `.env` into the process environment first. Covers
//! the three settings named in the external-interfaces configuration list
//! (`lockTtl`, `notificationTopicId`, `stateBucket`) plus the reference
//! store's connection details.

use std::time::Duration;

use serde::Deserialize;

use wsn_core::errors::{DifferError, ErrorKind, Result};

use crate::worker::WorkerConfig;

fn default_lock_ttl_secs() -> u64 {
    600
}

fn default_state_bucket_prefix() -> String {
    String::new()
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_lock_ttl_secs")]
    pub lock_ttl_secs: u64,
    pub notification_topic_id: String,
    #[serde(default = "default_state_bucket_prefix")]
    pub state_bucket_prefix: String,
    /// Path to the reference sqlite repository database file.
    pub sqlite_path: String,
    /// Root directory for the filesystem-backed blob store.
    pub cas_root: String,
    /// Base URL for the HTTP feature-data API.
    pub feature_api_base_url: String,
}

impl AppConfig {
    /// Loads `config/default.{toml,yaml,json,...}` (if present) then layers
    /// environment variables prefixed `WSN__`, e.g. `WSN__LOCK_TTL_SECS=300`.
    /// `.env` is loaded into the environment first via `dotenvy`, silently
    /// ignored if absent.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let raw = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::Environment::with_prefix("WSN").separator("__"))
            .build()
            .map_err(|e| {
                DifferError::new(ErrorKind::Internal)
                    .with_op("config_load")
                    .with_message(e.to_string())
            })?;

        raw.try_deserialize().map_err(|e| {
            DifferError::new(ErrorKind::Internal)
                .with_op("config_deserialize")
                .with_message(e.to_string())
        })
    }

    pub fn lock_ttl(&self) -> Duration {
        Duration::from_secs(self.lock_ttl_secs)
    }

    pub fn worker_config(&self) -> WorkerConfig {
        WorkerConfig {
            lock_ttl: self.lock_ttl(),
            notification_topic_id: self.notification_topic_id.clone(),
            state_bucket_prefix: self.state_bucket_prefix.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_config_carries_the_three_process_wide_settings() {
        let app = AppConfig {
            lock_ttl_secs: 120,
            notification_topic_id: "topic".to_string(),
            state_bucket_prefix: "prefix/".to_string(),
            sqlite_path: "wsn.db".to_string(),
            cas_root: "cas".to_string(),
            feature_api_base_url: "http://localhost".to_string(),
        };
        let worker_config = app.worker_config();
        assert_eq!(worker_config.lock_ttl, Duration::from_secs(120));
        assert_eq!(worker_config.notification_topic_id, "topic");
        assert_eq!(worker_config.state_bucket_prefix, "prefix/");
    }
}
