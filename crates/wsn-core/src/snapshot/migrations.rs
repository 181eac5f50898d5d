//! Snapshot migration registry
//!
//! A finite directed graph of `versionN -> versionN+1` upgrade edges. The
//! migrator is constructed once (duplicate registration is a fatal assertion
//! at construction time) and passed to the codec as a plain value rather than
//! kept as process-wide mutable state.

use std::collections::{HashMap, HashSet};

use crate::errors::{DifferError, ErrorKind, Result};

/// A single `from -> to` upgrade step, operating on the raw JSON `data`
/// payload of a snapshot blob (the envelope's `kind`/`apiVersion` are
/// handled by the codec, not by individual upgraders).
pub type UpgradeFn = fn(serde_json::Value) -> serde_json::Value;

#[derive(Clone, Copy)]
struct Edge {
    to: &'static str,
    upgrade: UpgradeFn,
}

/// Registry of version upgrade edges, keyed by source version.
#[derive(Default)]
pub struct MigrationRegistry {
    edges: HashMap<&'static str, Edge>,
}

impl MigrationRegistry {
    pub fn new() -> Self {
        Self {
            edges: HashMap::new(),
        }
    }

    /// Register an upgrade edge. Panics if `from` already has a registered
    /// edge — registering two upgraders for the same source version is a
    /// build-time programming error, not a runtime condition to recover from.
    pub fn register(&mut self, from: &'static str, to: &'static str, upgrade: UpgradeFn) {
        if self.edges.contains_key(from) {
            panic!("duplicate migration registered for version {from}");
        }
        self.edges.insert(from, Edge { to, upgrade });
    }

    /// Migrate `data` from `from_version` to `current_version`, applying
    /// every edge on the path. Detects cycles with an explicit visited set
    /// rather than recursing unboundedly.
    pub fn migrate(
        &self,
        mut data: serde_json::Value,
        from_version: &str,
        current_version: &str,
    ) -> Result<serde_json::Value> {
        if from_version == current_version {
            return Ok(data);
        }

        let mut visited = HashSet::new();
        let mut current = from_version.to_string();
        visited.insert(current.clone());

        loop {
            let edge = self.edges.get(current.as_str()).ok_or_else(|| {
                DifferError::new(ErrorKind::MigrationPathNotFound).with_message(format!(
                    "no migration path from {from_version} to {current_version}"
                ))
            })?;
            data = (edge.upgrade)(data);
            current = edge.to.to_string();

            if current == current_version {
                return Ok(data);
            }
            if !visited.insert(current.clone()) {
                return Err(DifferError::new(ErrorKind::MigrationCycle)
                    .with_message(format!("migration cycle detected at version {current}")));
            }
        }
    }
}
