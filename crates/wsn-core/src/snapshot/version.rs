//! Envelope kind and version constants

pub const KIND_SNAPSHOT: &str = "FeatureListSnapshot";
pub const KIND_DIFF: &str = "FeatureListDiff";

/// The current snapshot blob schema version. Bump this and register a
/// migration (see [`super::migrations`]) whenever the snapshot schema
/// changes in a way that is not quiet-rollout compatible.
pub const CURRENT_SNAPSHOT_VERSION: &str = "v1";

/// The current diff blob schema version. Diff blobs are write-once and
/// consumed downstream rather than migrated on read, so this is a single
/// constant rather than a registry entry.
pub const CURRENT_DIFF_VERSION: &str = "v1";
