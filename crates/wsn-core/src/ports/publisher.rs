//! The downstream pub/sub publisher contract

use async_trait::async_trait;

use crate::errors::Result;

/// Publishes the minimal `{eventId}` envelope to a downstream topic after
/// the DB commit. At-least-once: a publish failure after commit is returned
/// as transient so the queue retries the whole job.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, topic_id: &str, bytes: &[u8]) -> Result<String>;
}
