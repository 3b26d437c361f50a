// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn fresh() -> RunState {
    RunState::new(
        RunId::new("20260301-093000-abc123"),
        "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
        "/data/workspace/runs/20260301-093000-abc123",
        "2026-03-01T09:30:00.000000Z",
    )
    .unwrap()
}

#[test]
fn new_run_starts_at_router_pending() {
    let state = fresh();
    assert_eq!(state.current_stage, Stage::Router);
    assert_eq!(state.current_attempt, 1);
    assert_eq!(state.qa_status, QaStatus::Pending);
    assert_eq!(state.escalation_state, EscalationState::None);
    assert!(state.stages_completed.is_empty());
    assert_eq!(state.created_at, state.updated_at);
    assert!(!state.is_terminal());
}

#[test]
fn empty_run_id_is_rejected() {
    let err = RunState::new(RunId::new(""), "https://x", "/w", "2026-03-01T09:30:00Z");
    assert!(err.is_err());
}

#[test]
fn empty_url_is_rejected() {
    let err = RunState::new(RunId::new("r"), "", "/w", "2026-03-01T09:30:00Z");
    assert!(err.is_err());
}

#[test]
fn zero_attempt_fails_validation() {
    let mut state = fresh();
    state.current_attempt = 0;
    assert!(state.validate().is_err());
}

#[yare::parameterized(
    none      = { EscalationState::None, "none" },
    layout    = { EscalationState::LayoutUnknown, "layout_unknown" },
    exhausted = { EscalationState::QaExhausted, "qa_exhausted" },
    error     = { EscalationState::ErrorEscalated, "error_escalated" },
)]
fn escalation_state_names(state: EscalationState, expected: &str) {
    assert_eq!(state.as_str(), expected);
}

#[test]
fn terminal_check_follows_stage() {
    let mut state = fresh();
    state.current_stage = Stage::Completed;
    assert!(state.is_terminal());
    state.current_stage = Stage::Failed;
    assert!(state.is_terminal());
}
