//! Snapshot and diff blob encode/decode
//!
//! `decode` reads the envelope header first, checks `kind`, and routes the
//! payload through the migration registry before deserializing it into the
//! current [`Snapshot`] shape. `encode` always writes the current version.

use crate::errors::{DifferError, ErrorKind, Result};

use super::envelope::{Envelope, EnvelopeHeader};
use super::migrations::MigrationRegistry;
use super::model::{DiffBlob, Snapshot};
use super::version::{CURRENT_DIFF_VERSION, CURRENT_SNAPSHOT_VERSION, KIND_DIFF, KIND_SNAPSHOT};

/// Encode/decode snapshot blobs, migrating older versions on read.
pub struct SnapshotCodec {
    registry: MigrationRegistry,
}

impl SnapshotCodec {
    pub fn new(registry: MigrationRegistry) -> Self {
        Self { registry }
    }

    pub fn encode(&self, snapshot: &Snapshot) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(snapshot)?)
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<Snapshot> {
        if bytes.is_empty() {
            return Err(DifferError::new(ErrorKind::MalformedBlob)
                .with_message("empty snapshot bytes cannot be decoded; treat as cold start instead"));
        }

        let raw: serde_json::Value = serde_json::from_slice(bytes)?;
        let header: EnvelopeHeader = serde_json::from_value(raw.clone())?;

        if header.kind != KIND_SNAPSHOT {
            return Err(DifferError::new(ErrorKind::WrongKind).with_message(format!(
                "expected kind {KIND_SNAPSHOT}, got {}",
                header.kind
            )));
        }

        let metadata = raw
            .get("metadata")
            .cloned()
            .ok_or_else(|| DifferError::new(ErrorKind::MalformedBlob).with_message("missing metadata"))?;
        let data = raw
            .get("data")
            .cloned()
            .ok_or_else(|| DifferError::new(ErrorKind::MalformedBlob).with_message("missing data"))?;

        let migrated_data =
            self.registry
                .migrate(data, &header.api_version, CURRENT_SNAPSHOT_VERSION)?;

        let envelope = Envelope {
            kind: header.kind,
            api_version: CURRENT_SNAPSHOT_VERSION.to_string(),
            metadata: serde_json::from_value(metadata)?,
            data: serde_json::from_value(migrated_data)?,
        };
        Ok(envelope)
    }
}

/// Diff blobs are write-once and never migrated on read; encode/decode only
/// validates the kind tag.
pub fn encode_diff(diff: &DiffBlob) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(diff)?)
}

pub fn decode_diff(bytes: &[u8]) -> Result<DiffBlob> {
    let header: EnvelopeHeader = serde_json::from_slice(bytes)?;
    if header.kind != KIND_DIFF {
        return Err(DifferError::new(ErrorKind::WrongKind).with_message(format!(
            "expected kind {KIND_DIFF}, got {}",
            header.kind
        )));
    }
    if header.api_version != CURRENT_DIFF_VERSION {
        return Err(DifferError::new(ErrorKind::UnknownVersion).with_message(format!(
            "unknown diff version {}",
            header.api_version
        )));
    }
    Ok(serde_json::from_slice(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::model::{new_snapshot, SnapshotMetadata};
    use std::collections::BTreeMap;

    fn sample_snapshot() -> Snapshot {
        new_snapshot(
            SnapshotMetadata {
                id: "state-1".to_string(),
                generated_at: chrono::Utc::now(),
                search_id: "s1".to_string(),
                query_signature: "group:css".to_string(),
                event_id: None,
            },
            BTreeMap::new(),
        )
    }

    #[test]
    fn round_trip_encode_decode_is_identity() {
        let codec = SnapshotCodec::new(MigrationRegistry::new());
        let snapshot = sample_snapshot();
        let bytes = codec.encode(&snapshot).unwrap();
        let decoded = codec.decode(&bytes).unwrap();
        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn wrong_kind_is_fatal() {
        let codec = SnapshotCodec::new(MigrationRegistry::new());
        let bytes = br#"{"kind":"NotASnapshot","apiVersion":"v1","metadata":{},"data":{}}"#;
        let err = codec.decode(bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WrongKind);
    }

    #[test]
    fn empty_bytes_is_malformed_not_panic() {
        let codec = SnapshotCodec::new(MigrationRegistry::new());
        let err = codec.decode(&[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedBlob);
    }

    #[test]
    fn unknown_version_with_no_migration_path_is_fatal() {
        let codec = SnapshotCodec::new(MigrationRegistry::new());
        let bytes = format!(
            r#"{{"kind":"{}","apiVersion":"v99","metadata":{{"id":"x","generatedAt":"2024-01-01T00:00:00Z","searchId":"s1","querySignature":"q"}},"data":{{"features":{{}}}}}}"#,
            KIND_SNAPSHOT
        );
        let err = codec.decode(bytes.as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MigrationPathNotFound);
    }
}
