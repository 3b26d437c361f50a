// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use rw_adapters::FakeMessenger;
use rw_core::test_support::run_state_at;
use rw_storage::FileStateStore;
use tempfile::tempdir;

fn persisted(run_id: &str, stage: Stage, completed: &[&str]) -> RunState {
    let mut state = run_state_at(stage);
    state.run_id = rw_core::RunId::new(run_id);
    state.stages_completed = completed.iter().map(|s| s.to_string()).collect();
    state
}

async fn scan_with(states: Vec<RunState>) -> (Vec<RecoveryPlan>, FakeMessenger) {
    let dir = tempdir().unwrap();
    let store = FileStateStore::new(dir.path());
    for state in &states {
        store.save(state).await.unwrap();
    }
    let messenger = FakeMessenger::new();
    let plans = CrashRecovery::new(store, messenger.clone())
        .scan()
        .await
        .unwrap();
    (plans, messenger)
}

#[tokio::test]
async fn clean_startup_yields_no_plans() {
    let (plans, messenger) = scan_with(vec![]).await;
    assert!(plans.is_empty());
    assert!(messenger.notifications().is_empty());
}

#[tokio::test]
async fn interrupted_run_resumes_at_first_missing_stage() {
    let state = persisted(
        "20260301-093000-abc123",
        Stage::Transcript,
        &["router", "research"],
    );
    let (plans, messenger) = scan_with(vec![state]).await;

    assert_eq!(plans.len(), 1);
    let plan = &plans[0];
    assert_eq!(plan.resume_from, Stage::Transcript);
    assert_eq!(plan.stages_already_done, 2);
    assert_eq!(plan.stages_remaining.len(), 6);
    assert_eq!(plan.stages_remaining[0], Stage::Transcript);

    let notifications = messenger.notifications();
    assert_eq!(notifications.len(), 1);
    assert!(notifications[0].contains("transcript"));
    assert!(notifications[0].contains("2 of 8"));
}

#[tokio::test]
async fn unknown_stage_names_are_ignored() {
    let state = persisted(
        "20260301-093000-abc123",
        Stage::Research,
        &["router", "color_grading"],
    );
    let (plans, _) = scan_with(vec![state]).await;
    assert_eq!(plans[0].stages_already_done, 1);
    assert_eq!(plans[0].resume_from, Stage::Research);
}

#[tokio::test]
async fn inconsistent_run_is_skipped_with_no_plan() {
    let all: Vec<&str> = STAGE_SEQUENCE.iter().map(|s| s.as_str()).collect();
    let state = persisted("20260301-093000-abc123", Stage::Delivery, &all);
    let (plans, messenger) = scan_with(vec![state]).await;
    assert!(plans.is_empty());
    assert!(messenger.notifications().is_empty());
}

#[tokio::test]
async fn terminal_runs_are_not_scanned() {
    let state = persisted("20260301-093000-abc123", Stage::Completed, &[]);
    let (plans, _) = scan_with(vec![state]).await;
    assert!(plans.is_empty());
}

#[tokio::test]
async fn notification_failure_does_not_drop_the_plan() {
    let dir = tempdir().unwrap();
    let store = FileStateStore::new(dir.path());
    store
        .save(&persisted("20260301-093000-abc123", Stage::Router, &[]))
        .await
        .unwrap();

    let messenger = FakeMessenger::new();
    messenger.set_fail_sends(true);
    let plans = CrashRecovery::new(store, messenger).scan().await.unwrap();
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0].resume_from, Stage::Router);
}

#[tokio::test]
async fn multiple_interrupted_runs_each_get_a_plan() {
    let a = persisted("20260301-093000-aaaaaa", Stage::Router, &[]);
    let b = persisted("20260301-094500-bbbbbb", Stage::Content, &["router", "research", "transcript"]);
    let (plans, messenger) = scan_with(vec![a, b]).await;
    assert_eq!(plans.len(), 2);
    assert_eq!(messenger.notifications().len(), 2);
}
