//! wsn-core - canonical feature model, comparator, reconciler, and codec
//!
//! This crate provides the pure, in-process domain logic for the event
//! producer worker:
//! - The canonical feature model with tri-state optionality on every
//!   evolvable leaf ([`model`]).
//! - The snapshot and diff blob codec, with a migration registry for
//!   evolving the snapshot schema across versions ([`snapshot`]).
//! - The comparator, history reconciler, sorting, and summary pipeline
//!   ([`diff`]).
//! - The async port traits the orchestrators (in `wsn-engine`) drive
//!   ([`ports`]).
//!
//! Orchestration (lock acquisition, blob persistence, DB commit, publish) is
//! deliberately outside this crate; see `wsn-engine`.

pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod ports;
pub mod snapshot;

pub use diff::{compare, reconcile, summarize, FeatureOracle, OracleOutcome, ReconciledDelta, Summary};
pub use errors::{DifferError, ErrorClass, ErrorKind, Result};
pub use model::{CanonicalFeature, Optional};
pub use ports::{BlobStore, FeatureFetcher, Publisher, Repository};
pub use snapshot::{Snapshot, SnapshotCodec};
