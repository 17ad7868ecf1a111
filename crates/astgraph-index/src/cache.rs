//! Removing the persisted graph store.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// SQLite keeps these next to a WAL-mode database.
const SIDECAR_SUFFIXES: &[&str] = &["-wal", "-shm"];

/// Delete the graph database file so the next index starts from nothing.
///
/// Never fails: deletion errors are logged and swallowed.
pub fn clear_cache(db_path: &Path) {
    if db_path.exists() {
        match std::fs::remove_file(db_path) {
            Ok(()) => info!("GraphDB cache cleared: {:?}", db_path),
            Err(e) => {
                error!("Failed to clear GraphDB cache {:?}: {}", db_path, e);
                return;
            }
        }
    } else {
        debug!("No GraphDB cache at {:?}", db_path);
    }

    for path in sidecar_paths(db_path) {
        if path.exists() {
            if let Err(e) = std::fs::remove_file(&path) {
                error!("Failed to remove {:?}: {}", path, e);
            }
        }
    }
}

fn sidecar_paths(db_path: &Path) -> Vec<PathBuf> {
    SIDECAR_SUFFIXES
        .iter()
        .map(|suffix| {
            let mut name = OsString::from(db_path.as_os_str());
            name.push(suffix);
            PathBuf::from(name)
        })
        .collect()
}
