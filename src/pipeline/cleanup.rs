//! Intermediate artifact tracking and removal.
//!
//! Stages register every transient path they create in a [`CleanupSet`];
//! after the target finished (or failed), [`CleanupSet::sweep`] removes them
//! all. The sweep is best-effort: paths that are already gone are fine, and
//! a path that cannot be removed is logged and skipped so one stubborn file
//! never fails an otherwise successful run.

use std::path::{Path, PathBuf};
use tokio::fs;

/// Collects the intermediate paths of one output target.
#[derive(Debug, Default)]
pub struct CleanupSet {
    paths: Vec<PathBuf>,
}

impl CleanupSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a path for removal, ignoring duplicates.
    pub fn track(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if !self.paths.contains(&path) {
            self.paths.push(path);
        }
    }

    /// Paths registered so far, in registration order.
    #[allow(dead_code)] // Public API - preserved for external consumers
    pub fn tracked(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Removes every tracked path.
    ///
    /// Directories are removed recursively. Missing paths are ignored;
    /// failures are logged as warnings and do not stop the sweep.
    pub async fn sweep(self) {
        for path in self.paths {
            match remove_path(&path).await {
                Ok(()) => log::debug!("Removed intermediate {}", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => log::warn!("Failed to remove intermediate {}: {e}", path.display()),
            }
        }
    }
}

async fn remove_path(path: &Path) -> std::io::Result<()> {
    let metadata = fs::symlink_metadata(path).await?;
    if metadata.is_dir() {
        fs::remove_dir_all(path).await
    } else {
        fs::remove_file(path).await
    }
}
