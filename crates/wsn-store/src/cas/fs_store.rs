//! Filesystem-backed [`BlobStore`] adapter
//!
//! Paths are exact, caller-supplied (e.g. `searches/{searchId}/{snapshotType}/state_<unique>`),
//! not content-addressed: the worker mints a fresh unique path per write, so
//! write-once is enforced by construction rather than by digest collision
//! detection.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::cas::atomic::atomic_write;
use crate::errors::{blob_collision, from_io, Result};
use wsn_core::ports::BlobStore;

pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn read(&self, path: &str) -> Result<Option<Vec<u8>>> {
        let target = self.resolve(path);
        let path_owned = path.to_string();
        tokio::task::spawn_blocking(move || match std::fs::read(&target) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(from_io(&format!("blob_read:{path_owned}"), e)),
        })
        .await
        .map_err(|e| crate::errors::task_join_error("blob_read", &e.to_string()))?
    }

    async fn write(&self, path: &str, bytes: &[u8]) -> Result<()> {
        let target = self.resolve(path);
        let bytes = bytes.to_vec();
        let path_owned = path.to_string();
        tokio::task::spawn_blocking(move || {
            if target.exists() {
                let existing = std::fs::read(&target).map_err(|e| from_io("blob_read_existing", e))?;
                if existing == bytes {
                    return Ok(());
                }
                return Err(blob_collision(&path_owned));
            }
            atomic_write(&target, &bytes)
        })
        .await
        .map_err(|e| crate::errors::task_join_error("blob_write", &e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (FsBlobStore, TempDir) {
        let dir = TempDir::new().unwrap();
        (FsBlobStore::new(dir.path()), dir)
    }

    #[tokio::test]
    async fn write_then_read_round_trips() {
        let (store, _dir) = store();
        store.write("searches/s1/state/state_1", b"hello").await.unwrap();
        let read = store.read("searches/s1/state/state_1").await.unwrap();
        assert_eq!(read, Some(b"hello".to_vec()));
    }

    #[tokio::test]
    async fn read_missing_returns_none() {
        let (store, _dir) = store();
        let read = store.read("does/not/exist").await.unwrap();
        assert_eq!(read, None);
    }

    #[tokio::test]
    async fn rewriting_same_content_is_idempotent() {
        let (store, _dir) = store();
        store.write("p", b"same").await.unwrap();
        store.write("p", b"same").await.unwrap();
    }

    #[tokio::test]
    async fn rewriting_different_content_at_same_path_is_a_collision() {
        let (store, _dir) = store();
        store.write("p", b"one").await.unwrap();
        let err = store.write("p", b"two").await.unwrap_err();
        assert_eq!(err.kind(), wsn_core::errors::ErrorKind::BlobStoreError);
    }
}
