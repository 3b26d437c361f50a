// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only per-run events.log.
//!
//! One writer is subscribed to the bus for the process lifetime; the
//! pipeline runner points it at the active run's log file. Events published
//! while no run is active are dropped (they still reach the process log via
//! tracing).

use async_trait::async_trait;
use parking_lot::Mutex;
use rw_core::{EventListener, ListenerError, PipelineEvent};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

/// Appends one line per event:
///
/// ```text
/// <ISO8601> | <event_name> | <stage_or_none> | <compact-json-data>
/// ```
#[derive(Clone, Default)]
pub struct EventJournalWriter {
    log_path: Arc<Mutex<Option<PathBuf>>>,
}

impl EventJournalWriter {
    /// An unrouted journal; call [`route_to`](Self::route_to) at run start.
    pub fn new() -> Self {
        Self::default()
    }

    /// A journal fixed to one log file.
    pub fn at(log_path: impl Into<PathBuf>) -> Self {
        let writer = Self::default();
        writer.route_to(log_path);
        writer
    }

    /// Direct subsequent events into the given log file.
    pub fn route_to(&self, log_path: impl Into<PathBuf>) {
        *self.log_path.lock() = Some(log_path.into());
    }

    /// Format an event as a single journal line (without the newline).
    pub fn format_line(event: &PipelineEvent) -> Result<String, ListenerError> {
        let stage = event.stage.map(|s| s.as_str()).unwrap_or("none");
        let data = serde_json::to_string(&event.data)?;
        Ok(format!(
            "{} | {} | {} | {}",
            event.timestamp, event.name, stage, data
        ))
    }
}

#[async_trait]
impl EventListener for EventJournalWriter {
    async fn handle(&self, event: &PipelineEvent) -> Result<(), ListenerError> {
        let Some(log_path) = self.log_path.lock().clone() else {
            return Ok(());
        };
        let mut line = Self::format_line(event)?;
        line.push('\n');

        if let Some(parent) = log_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "journal_tests.rs"]
mod tests;
