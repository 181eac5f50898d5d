//! Error helpers for wsn-store
//!
//! Wraps wsn-core's `DifferError` with store-specific constructors. Every
//! adapter error here classifies `Transient` (see `ErrorKind::class`) since
//! storage, blob, and fetcher failures are all retryable by the queue.

use wsn_core::errors::{DifferError, ErrorKind};

pub type Result<T> = std::result::Result<T, DifferError>;

pub fn blob_missing(path: &str) -> DifferError {
    DifferError::new(ErrorKind::BlobStoreError)
        .with_op("blob_read")
        .with_message(format!("blob not found at path {path}"))
}

pub fn blob_collision(path: &str) -> DifferError {
    DifferError::new(ErrorKind::BlobStoreError)
        .with_op("blob_write")
        .with_message(format!("write-once violation: path {path} already holds different content"))
}

pub fn from_rusqlite(op: &str, err: rusqlite::Error) -> DifferError {
    DifferError::new(ErrorKind::RepositoryError)
        .with_op(op)
        .with_message(err.to_string())
}

pub fn from_io(op: &str, err: std::io::Error) -> DifferError {
    DifferError::new(ErrorKind::BlobStoreError)
        .with_op(op)
        .with_message(err.to_string())
}

pub fn from_reqwest(op: &str, err: reqwest::Error) -> DifferError {
    DifferError::new(ErrorKind::FetcherError)
        .with_op(op)
        .with_message(err.to_string())
}

pub fn task_join_error(op: &str, reason: &str) -> DifferError {
    DifferError::new(ErrorKind::Internal)
        .with_op(op)
        .with_message(format!("blocking task join failed: {reason}"))
}

pub fn migration_error(migration_id: &str, reason: &str) -> DifferError {
    DifferError::new(ErrorKind::Internal)
        .with_op("migration")
        .with_message(format!("migration {migration_id} failed: {reason}"))
}

pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> DifferError {
    DifferError::new(ErrorKind::Internal)
        .with_op("migration_checksum")
        .with_message(format!(
            "checksum mismatch for migration {migration_id}: expected {expected}, got {actual}"
        ))
}
