// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use rw_core::{names, Stage};
use tempfile::tempdir;

fn event() -> PipelineEvent {
    PipelineEvent::new(
        "2026-03-01T09:30:00.000000Z",
        names::STAGE_COMPLETED,
        Some(Stage::Router),
    )
    .with_data("score", 85)
}

#[test]
fn line_format_is_pipe_separated_with_compact_json() {
    let line = EventJournalWriter::format_line(&event()).unwrap();
    assert_eq!(
        line,
        "2026-03-01T09:30:00.000000Z | pipeline.stage_completed | router | {\"score\":85}"
    );
}

#[test]
fn stage_renders_as_none_when_absent() {
    let event = PipelineEvent::new("2026-03-01T09:30:00.000000Z", names::RUN_STARTED, None);
    let line = EventJournalWriter::format_line(&event).unwrap();
    assert!(line.contains(" | pipeline.run_started | none | {}"));
}

#[tokio::test]
async fn handle_appends_one_line_per_event() {
    let dir = tempdir().unwrap();
    let log_path = dir.path().join("runs/r1/events.log");
    let writer = EventJournalWriter::at(&log_path);

    writer.handle(&event()).await.unwrap();
    writer.handle(&event()).await.unwrap();

    let content = std::fs::read_to_string(&log_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("{\"score\":85}"));
}

#[tokio::test]
async fn unrouted_journal_drops_events() {
    let writer = EventJournalWriter::new();
    writer.handle(&event()).await.unwrap();
}

#[tokio::test]
async fn route_to_switches_the_active_log() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("r1/events.log");
    let second = dir.path().join("r2/events.log");
    let writer = EventJournalWriter::new();

    writer.route_to(&first);
    writer.handle(&event()).await.unwrap();
    writer.route_to(&second);
    writer.handle(&event()).await.unwrap();

    assert_eq!(std::fs::read_to_string(&first).unwrap().lines().count(), 1);
    assert_eq!(std::fs::read_to_string(&second).unwrap().lines().count(), 1);
}
