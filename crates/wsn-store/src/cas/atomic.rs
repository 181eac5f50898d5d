//! Atomic write primitives
//!
//! Uses temp→rename pattern to ensure no partial writes

#![allow(clippy::result_large_err)]

use crate::errors::{io_error, Result};
use std::fs;
use std::path::Path;

/// Atomically write bytes to a file
///
/// Uses temp file + rename to ensure atomic write
pub fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    // Create parent directory if it doesn't exist
    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error("create_cas_dir", e))?;
    }

    // Create temp file in the same directory
    let temp_path = target_path.with_extension("tmp");

    // Write to temp file
    fs::write(&temp_path, content).map_err(|e| io_error("write_cas_temp", e))?;

    // Atomically rename temp to target
    fs::rename(&temp_path, target_path).map_err(|e| io_error("rename_cas_temp", e))?;

    Ok(())
}
