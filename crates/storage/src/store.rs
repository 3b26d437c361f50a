// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable, human-readable persistence of run state

use crate::frontmatter::{deserialize_run_state, serialize_run_state};
use async_trait::async_trait;
use rw_core::{RunId, RunState, ValidationError};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Errors from state-store operations.
#[derive(Debug, Error)]
pub enum StateStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed run file: {0}")]
    Malformed(#[from] ValidationError),
}

/// Persistence port for run state.
#[async_trait]
pub trait StateStore: Clone + Send + Sync + 'static {
    /// Write the state durably. Readers never observe a partial file.
    async fn save(&self, state: &RunState) -> Result<(), StateStoreError>;

    /// Load a run by id; `Ok(None)` when the run file is absent.
    async fn load(&self, run_id: &RunId) -> Result<Option<RunState>, StateStoreError>;

    /// All runs whose current stage is not terminal. Corrupt files are
    /// skipped with a log entry.
    async fn list_incomplete(&self) -> Result<Vec<RunState>, StateStoreError>;
}

/// State store writing one `run.md` per run under `{base}/{run_id}/`.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    base_dir: PathBuf,
}

impl FileStateStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn run_file(&self, run_id: &RunId) -> PathBuf {
        self.base_dir.join(run_id.as_str()).join("run.md")
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn save(&self, state: &RunState) -> Result<(), StateStoreError> {
        let target = self.run_file(&state.run_id);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = serialize_run_state(state)?;
        let tmp = target.with_extension("md.tmp");

        // Write the sibling temp file, then rename onto the target so a
        // concurrent reader sees either the old or the new file, never a
        // partial one.
        let written = async {
            tokio::fs::write(&tmp, content.as_bytes()).await?;
            tokio::fs::rename(&tmp, &target).await
        }
        .await;

        if let Err(err) = written {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(err.into());
        }
        Ok(())
    }

    async fn load(&self, run_id: &RunId) -> Result<Option<RunState>, StateStoreError> {
        let target = self.run_file(run_id);
        let content = match tokio::fs::read_to_string(&target).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(deserialize_run_state(&content)?))
    }

    async fn list_incomplete(&self) -> Result<Vec<RunState>, StateStoreError> {
        let mut dirs = match tokio::fs::read_dir(&self.base_dir).await {
            Ok(dirs) => dirs,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut run_files = Vec::new();
        while let Some(entry) = dirs.next_entry().await? {
            let run_file = entry.path().join("run.md");
            if tokio::fs::try_exists(&run_file).await.unwrap_or(false) {
                run_files.push(run_file);
            }
        }
        run_files.sort();

        let mut results = Vec::new();
        for run_file in run_files {
            match load_run_file(&run_file).await {
                Ok(state) if !state.is_terminal() => results.push(state),
                Ok(_terminal) => {}
                Err(err) => {
                    warn!(file = %run_file.display(), error = %err, "skipping corrupted run file");
                }
            }
        }
        Ok(results)
    }
}

async fn load_run_file(path: &Path) -> Result<RunState, StateStoreError> {
    let content = tokio::fs::read_to_string(path).await?;
    Ok(deserialize_run_state(&content)?)
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
