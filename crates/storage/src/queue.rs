// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File-backed FIFO queue with at-most-once claim semantics.
//!
//! Layout:
//!
//! ```text
//! {base}/
//!     inbox/          # pending items, {queued_at_us}-{8-hex}.json
//!     processing/     # items owned by a consumer
//!     completed/      # finished items, retained for audit
//! ```
//!
//! Claims take a non-blocking exclusive advisory lock on a per-candidate
//! `.lock` file before moving the item, so two consumers on the same
//! directory can never both claim one candidate. The lock is per-candidate
//! rather than directory-wide so enqueue never serializes behind a claim.

use fs2::FileExt;
use rw_core::QueueItem;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors from queue operations.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed queue item {file}: {reason}")]
    Malformed { file: String, reason: String },
}

/// Persistent FIFO of pending work, shared across consumer processes.
#[derive(Debug, Clone)]
pub struct FileQueue {
    inbox: PathBuf,
    processing: PathBuf,
    completed: PathBuf,
}

impl FileQueue {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        let base = base_dir.as_ref();
        Self {
            inbox: base.join("inbox"),
            processing: base.join("processing"),
            completed: base.join("completed"),
        }
    }

    /// Create the queue directories if they don't exist.
    pub fn ensure_dirs(&self) -> Result<(), QueueError> {
        for dir in [&self.inbox, &self.processing, &self.completed] {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    /// Add an item to the inbox. Returns the created path.
    ///
    /// Filenames are `{queued_at_us}-{8-hex}.json` so lexicographic order
    /// equals chronological order.
    pub fn enqueue(&self, item: &QueueItem) -> Result<PathBuf, QueueError> {
        self.ensure_dirs()?;
        let nonce = uuid::Uuid::new_v4().simple().to_string();
        let name = format!("{}-{}.json", item.queued_at.timestamp_micros(), &nonce[..8]);
        let path = self.inbox.join(name);
        let body = serde_json::to_vec_pretty(item).map_err(|e| QueueError::Malformed {
            file: path.display().to_string(),
            reason: e.to_string(),
        })?;
        fs::write(&path, body)?;
        info!(file = %path.display(), url = %item.url, "enqueued item");
        Ok(path)
    }

    /// Claim the oldest inbox item by moving it to `processing/`.
    ///
    /// Candidates are tried in lexicographic (chronological) order; lock
    /// contention, parse errors, and vanished files skip to the next
    /// candidate. Returns `Ok(None)` when nothing claims.
    pub fn claim_next(&self) -> Result<Option<(QueueItem, PathBuf)>, QueueError> {
        self.ensure_dirs()?;

        let mut candidates: Vec<PathBuf> = fs::read_dir(&self.inbox)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        candidates.sort();

        for candidate in candidates {
            match self.try_claim(&candidate) {
                Ok(claimed) => return Ok(Some(claimed)),
                Err(err) => {
                    debug!(file = %candidate.display(), error = %err, "skipping candidate");
                    continue;
                }
            }
        }
        Ok(None)
    }

    /// Attempt one candidate under its advisory lock.
    fn try_claim(&self, inbox_path: &Path) -> Result<(QueueItem, PathBuf), QueueError> {
        let lock_path = inbox_path.with_extension("lock");
        let lock_file = File::create(&lock_path)?;
        lock_file.try_lock_exclusive()?;

        let result = (|| {
            // The candidate may have been claimed between listing and locking.
            let body = fs::read_to_string(inbox_path)?;
            let item: QueueItem =
                serde_json::from_str(&body).map_err(|e| QueueError::Malformed {
                    file: inbox_path.display().to_string(),
                    reason: e.to_string(),
                })?;

            let file_name = inbox_path
                .file_name()
                .ok_or_else(|| QueueError::Malformed {
                    file: inbox_path.display().to_string(),
                    reason: "no file name".to_string(),
                })?;
            let dest = self.processing.join(file_name);
            fs::rename(inbox_path, &dest)?;
            info!(file = %dest.display(), "claimed queue item");
            Ok((item, dest))
        })();

        let _ = FileExt::unlock(&lock_file);
        if fs::remove_file(&lock_path).is_err() {
            debug!(file = %lock_path.display(), "lock file already removed");
        }
        result
    }

    /// Move a processing item to `completed/`. Returns the new path.
    pub fn complete(&self, processing_path: &Path) -> Result<PathBuf, QueueError> {
        self.move_to(processing_path, &self.completed, "completed")
    }

    /// Return a processing item to `inbox/` for a later retry.
    pub fn fail(&self, processing_path: &Path) -> Result<PathBuf, QueueError> {
        self.move_to(processing_path, &self.inbox, "returned to inbox")
    }

    fn move_to(&self, from: &Path, dir: &Path, action: &str) -> Result<PathBuf, QueueError> {
        self.ensure_dirs()?;
        let file_name = from.file_name().ok_or_else(|| QueueError::Malformed {
            file: from.display().to_string(),
            reason: "no file name".to_string(),
        })?;
        let dest = dir.join(file_name);
        fs::rename(from, &dest)?;
        info!(file = %dest.display(), "{action} queue item");
        Ok(dest)
    }

    /// Number of well-named JSON files waiting in the inbox.
    pub fn pending_count(&self) -> usize {
        count_json_files(&self.inbox)
    }

    /// Number of items currently being processed.
    pub fn processing_count(&self) -> usize {
        count_json_files(&self.processing)
    }

    /// Number of finished items retained for audit.
    pub fn completed_count(&self) -> usize {
        count_json_files(&self.completed)
    }
}

fn count_json_files(dir: &Path) -> usize {
    let Ok(entries) = fs::read_dir(dir) else {
        return 0;
    };
    entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
        .count()
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
