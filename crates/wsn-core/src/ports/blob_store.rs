//! The blob storage contract

use async_trait::async_trait;

use crate::errors::Result;

/// Content-addressed or path-addressed blob storage backend. Write-once
/// semantics are expected: no concurrent writer produces the same path.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// `Ok(None)` if the path does not exist. Used by the worker to recover
    /// to cold start when a state pointer references a missing blob.
    async fn read(&self, path: &str) -> Result<Option<Vec<u8>>>;

    async fn write(&self, path: &str, bytes: &[u8]) -> Result<()>;
}
