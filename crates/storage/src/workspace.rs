// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-run workspace directories.
//!
//! Layout:
//!
//! ```text
//! {base}/
//!     runs/
//!         {YYYYMMDD-HHMMSS}-{6-hex}/
//!             run.md          # state checkpoint
//!             events.log      # event journal
//!             assets/         # stage artifacts
//! ```

use rw_core::{timestamped_id, Clock};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors from workspace operations.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Factory for per-run directories with monotonically increasing names.
#[derive(Clone)]
pub struct WorkspaceManager {
    runs_dir: PathBuf,
    clock: Arc<dyn Clock>,
}

impl WorkspaceManager {
    pub fn new(base_dir: impl AsRef<Path>, clock: Arc<dyn Clock>) -> Self {
        Self {
            runs_dir: base_dir.as_ref().join("runs"),
            clock,
        }
    }

    /// Create a fresh workspace with an eager `assets/` subdirectory.
    pub fn create(&self) -> Result<PathBuf, WorkspaceError> {
        fs::create_dir_all(&self.runs_dir)?;
        let name = timestamped_id(self.clock.now_utc());
        let workspace = self.runs_dir.join(name);
        fs::create_dir(&workspace)?;
        fs::create_dir(workspace.join("assets"))?;
        info!(workspace = %workspace.display(), "created workspace");
        Ok(workspace)
    }

    /// Scoped acquisition. The directory persists after the guard drops so
    /// crash recovery can resume into it.
    pub fn acquire(&self) -> Result<WorkspaceGuard, WorkspaceError> {
        Ok(WorkspaceGuard {
            path: self.create()?,
        })
    }

    /// All run workspaces sorted by name (chronological).
    pub fn list(&self) -> Result<Vec<PathBuf>, WorkspaceError> {
        let entries = match fs::read_dir(&self.runs_dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        let mut dirs: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_dir())
            .collect();
        dirs.sort();
        Ok(dirs)
    }
}

/// Handle to an acquired workspace.
pub struct WorkspaceGuard {
    path: PathBuf,
}

impl WorkspaceGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for WorkspaceGuard {
    fn drop(&mut self) {
        // The directory is left in place; cleanup is the retention
        // cleaner's job.
        info!(workspace = %self.path.display(), "workspace session ended");
    }
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
