//! Snapshot blob codec: versioned envelope, migration registry, and the
//! concrete snapshot/diff wire shapes.
//!
//! ## Responsibilities
//!
//! - Define the snapshot and diff blob envelopes and their wire formats
//! - Encode/decode those envelopes, migrating older snapshot versions
//!   forward through a registered upgrade chain
//!
//! ## Non-Responsibilities
//!
//! - Persistence (handled by `wsn-store`)
//! - Orchestration (handled by `wsn-engine`)

pub mod codec;
pub mod envelope;
pub mod migrations;
pub mod model;
pub mod version;

pub use codec::{decode_diff, encode_diff, SnapshotCodec};
pub use envelope::{Envelope, EnvelopeHeader};
pub use migrations::{MigrationRegistry, UpgradeFn};
pub use model::{new_diff_blob, new_snapshot, DiffBlob, DiffData, DiffMetadata, Snapshot, SnapshotData, SnapshotMetadata};
pub use version::{CURRENT_DIFF_VERSION, CURRENT_SNAPSHOT_VERSION, KIND_DIFF, KIND_SNAPSHOT};
