// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Strips old run directories down to their metadata.
//!
//! Intermediate artifacts (transcripts, frames, segment files) are deleted
//! once a run ages past the retention window; `run.md`, `events.log`, and
//! final `.mp4` files are always kept.

use chrono::{DateTime, Duration, Utc};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const DEFAULT_RETENTION_DAYS: i64 = 30;

/// Files preserved during cleanup.
const KEEP_NAMES: [&str; 2] = ["run.md", "events.log"];
const KEEP_SUFFIXES: [&str; 1] = ["mp4"];

/// Summary of one cleanup pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanupResult {
    pub runs_scanned: usize,
    pub runs_cleaned: usize,
    pub bytes_freed: u64,
}

/// Deletes old run assets while preserving metadata and delivered videos.
#[derive(Debug, Clone)]
pub struct RunCleaner {
    runs_dir: PathBuf,
    retention: Duration,
}

impl RunCleaner {
    pub fn new(runs_dir: impl Into<PathBuf>) -> Self {
        Self {
            runs_dir: runs_dir.into(),
            retention: Duration::days(DEFAULT_RETENTION_DAYS),
        }
    }

    pub fn with_retention_days(mut self, days: i64) -> Self {
        self.retention = Duration::days(days);
        self
    }

    /// Run the cleanup pass off the async runtime's worker threads.
    pub async fn clean(&self) -> std::io::Result<CleanupResult> {
        let cleaner = self.clone();
        tokio::task::spawn_blocking(move || cleaner.clean_sync())
            .await
            .map_err(std::io::Error::other)?
    }

    /// Scan the runs directory and remove old intermediate artifacts.
    pub fn clean_sync(&self) -> std::io::Result<CleanupResult> {
        if !self.runs_dir.exists() {
            return Ok(CleanupResult {
                runs_scanned: 0,
                runs_cleaned: 0,
                bytes_freed: 0,
            });
        }

        let cutoff = Utc::now() - self.retention;
        let mut scanned = 0;
        let mut cleaned = 0;
        let mut freed = 0;

        let mut run_dirs: Vec<PathBuf> = std::fs::read_dir(&self.runs_dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_dir() && !p.is_symlink())
            .collect();
        run_dirs.sort();

        for run_dir in run_dirs {
            scanned += 1;
            let run_md = run_dir.join("run.md");
            let Ok(meta) = std::fs::metadata(&run_md) else {
                continue;
            };
            let Ok(modified) = meta.modified() else {
                continue;
            };
            if DateTime::<Utc>::from(modified) >= cutoff {
                continue;
            }

            let run_freed = clean_run_dir(&run_dir);
            if run_freed > 0 {
                cleaned += 1;
                freed += run_freed;
            }
        }

        info!(
            scanned,
            cleaned,
            freed_mb = freed / (1024 * 1024),
            "cleanup complete"
        );
        Ok(CleanupResult {
            runs_scanned: scanned,
            runs_cleaned: cleaned,
            bytes_freed: freed,
        })
    }
}

/// Remove non-essential files from one run directory; returns bytes freed.
fn clean_run_dir(run_dir: &Path) -> u64 {
    let mut freed = 0;
    let mut stack = vec![run_dir.to_path_buf()];
    let mut subdirs = Vec::new();

    while let Some(dir) = stack.pop() {
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.filter_map(Result::ok) {
            let path = entry.path();
            if path.is_symlink() {
                continue;
            }
            if path.is_dir() {
                subdirs.push(path.clone());
                stack.push(path);
                continue;
            }
            if should_keep(&path) {
                continue;
            }
            let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
            match std::fs::remove_file(&path) {
                Ok(()) => freed += size,
                Err(err) => warn!(file = %path.display(), error = %err, "failed to delete"),
            }
        }
    }

    // Deepest-first so emptied parents can go too
    subdirs.sort();
    for dir in subdirs.into_iter().rev() {
        let _ = std::fs::remove_dir(&dir);
    }

    freed
}

fn should_keep(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    if KEEP_NAMES.contains(&name) {
        return true;
    }
    let suffix = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    KEEP_SUFFIXES.contains(&suffix)
}

#[cfg(test)]
#[path = "cleanup_tests.rs"]
mod tests;
