// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stage transition tables. Pure data, no I/O.

use crate::stage::Stage;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum agent executions per stage before best-of-three selection.
pub const MAX_QA_ATTEMPTS: u32 = 3;

/// Events that drive [`RunState`](crate::run::RunState) transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunEvent {
    QaPass,
    QaRework,
    QaFail,
    StageComplete,
    UnrecoverableError,
    EscalationRequested,
    EscalationResolved,
}

impl RunEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunEvent::QaPass => "qa_pass",
            RunEvent::QaRework => "qa_rework",
            RunEvent::QaFail => "qa_fail",
            RunEvent::StageComplete => "stage_complete",
            RunEvent::UnrecoverableError => "unrecoverable_error",
            RunEvent::EscalationRequested => "escalation_requested",
            RunEvent::EscalationResolved => "escalation_resolved",
        }
    }
}

impl fmt::Display for RunEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transition table: `(current stage, event) -> next stage`.
///
/// `qa_pass` walks the canonical sequence; rework, fail, and escalation
/// events stay on the current stage; `unrecoverable_error` jumps to the
/// terminal `failed` stage from every processing stage.
pub const TRANSITIONS: &[(Stage, RunEvent, Stage)] = &[
    // Normal forward progression
    (Stage::Router, RunEvent::QaPass, Stage::Research),
    (Stage::Research, RunEvent::QaPass, Stage::Transcript),
    (Stage::Transcript, RunEvent::QaPass, Stage::Content),
    (Stage::Content, RunEvent::QaPass, Stage::LayoutDetective),
    (Stage::LayoutDetective, RunEvent::QaPass, Stage::FfmpegEngineer),
    (Stage::FfmpegEngineer, RunEvent::QaPass, Stage::Assembly),
    (Stage::Assembly, RunEvent::QaPass, Stage::Delivery),
    (Stage::Delivery, RunEvent::StageComplete, Stage::Completed),
    // QA rework: stay for retry
    (Stage::Router, RunEvent::QaRework, Stage::Router),
    (Stage::Research, RunEvent::QaRework, Stage::Research),
    (Stage::Transcript, RunEvent::QaRework, Stage::Transcript),
    (Stage::Content, RunEvent::QaRework, Stage::Content),
    (Stage::LayoutDetective, RunEvent::QaRework, Stage::LayoutDetective),
    (Stage::FfmpegEngineer, RunEvent::QaRework, Stage::FfmpegEngineer),
    (Stage::Assembly, RunEvent::QaRework, Stage::Assembly),
    // QA fail: stay; the recovery chain or escalation takes over
    (Stage::Router, RunEvent::QaFail, Stage::Router),
    (Stage::Research, RunEvent::QaFail, Stage::Research),
    (Stage::Transcript, RunEvent::QaFail, Stage::Transcript),
    (Stage::Content, RunEvent::QaFail, Stage::Content),
    (Stage::LayoutDetective, RunEvent::QaFail, Stage::LayoutDetective),
    (Stage::FfmpegEngineer, RunEvent::QaFail, Stage::FfmpegEngineer),
    (Stage::Assembly, RunEvent::QaFail, Stage::Assembly),
    // Layout escalation: stay, wait for the user
    (
        Stage::LayoutDetective,
        RunEvent::EscalationRequested,
        Stage::LayoutDetective,
    ),
    (
        Stage::LayoutDetective,
        RunEvent::EscalationResolved,
        Stage::LayoutDetective,
    ),
    // Unrecoverable failure
    (Stage::Router, RunEvent::UnrecoverableError, Stage::Failed),
    (Stage::Research, RunEvent::UnrecoverableError, Stage::Failed),
    (Stage::Transcript, RunEvent::UnrecoverableError, Stage::Failed),
    (Stage::Content, RunEvent::UnrecoverableError, Stage::Failed),
    (
        Stage::LayoutDetective,
        RunEvent::UnrecoverableError,
        Stage::Failed,
    ),
    (
        Stage::FfmpegEngineer,
        RunEvent::UnrecoverableError,
        Stage::Failed,
    ),
    (Stage::Assembly, RunEvent::UnrecoverableError, Stage::Failed),
    (Stage::Delivery, RunEvent::UnrecoverableError, Stage::Failed),
];

/// Look up the next stage for a `(current, event)` pair.
pub fn next_stage(current: Stage, event: RunEvent) -> Option<Stage> {
    TRANSITIONS
        .iter()
        .find(|(from, ev, _)| *from == current && *ev == event)
        .map(|(_, _, to)| *to)
}

/// Whether a transition is defined in the table.
pub fn valid_transition(current: Stage, event: RunEvent) -> bool {
    next_stage(current, event).is_some()
}

#[cfg(test)]
#[path = "transitions_tests.rs"]
mod tests;
