// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test builders shared across the workspace's test suites
#![cfg_attr(coverage_nightly, coverage(off))]

use crate::id::{GateName, RunId};
use crate::qa::{QaCritique, QaDecision, QaStatus};
use crate::run::{EscalationState, RunState};
use crate::stage::Stage;

/// A valid run state parked on the given stage.
pub fn run_state_at(stage: Stage) -> RunState {
    RunState {
        run_id: RunId::new("20260301-093000-abc123"),
        youtube_url: "https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string(),
        current_stage: stage,
        current_attempt: 1,
        qa_status: QaStatus::Pending,
        stages_completed: Vec::new(),
        escalation_state: EscalationState::None,
        best_of_three_overrides: Vec::new(),
        created_at: "2026-03-01T09:30:00.000000Z".to_string(),
        updated_at: "2026-03-01T09:30:00.000000Z".to_string(),
        workspace_path: "/data/workspace/runs/20260301-093000-abc123".to_string(),
    }
}

/// A critique with the given decision, score, and attempt on a stub gate.
pub fn critique(decision: QaDecision, score: u8, attempt: u32) -> QaCritique {
    QaCritique {
        decision,
        score,
        gate: GateName::new("router"),
        attempt,
        blockers: Vec::new(),
        prescriptive_fixes: Vec::new(),
        confidence: 0.9,
    }
}
