// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Applies transition events to [`RunState`]

use crate::clock::Clock;
use crate::error::ValidationError;
use crate::qa::QaStatus;
use crate::run::{EscalationState, RunState};
use crate::stage::Stage;
use crate::transitions::{next_stage, RunEvent};

/// Check whether a transition is valid without applying it.
pub fn validate_transition(state: &RunState, event: RunEvent) -> bool {
    !state.current_stage.is_terminal() && next_stage(state.current_stage, event).is_some()
}

/// Apply a transition event, returning a new [`RunState`].
///
/// Fails with a [`ValidationError`] for terminal stages and for `(stage,
/// event)` pairs absent from the transition table. `updated_at` is stamped
/// from the supplied clock on every transition.
pub fn apply(state: &RunState, event: RunEvent, clock: &dyn Clock) -> Result<RunState, ValidationError> {
    if state.current_stage.is_terminal() {
        return Err(ValidationError::new(format!(
            "cannot transition from terminal stage {}",
            state.current_stage
        )));
    }

    let Some(target) = next_stage(state.current_stage, event) else {
        return Err(ValidationError::new(format!(
            "invalid transition: ({}, {})",
            state.current_stage, event
        )));
    };

    let now = clock.now_iso();
    let mut next = state.clone();
    next.updated_at = now;

    match event {
        RunEvent::QaPass => {
            next.stages_completed.push(state.current_stage.as_str().to_string());
            next.current_stage = target;
            next.current_attempt = 1;
            next.qa_status = QaStatus::Pending;
        }
        RunEvent::QaRework => {
            next.current_attempt = state.current_attempt + 1;
            next.qa_status = QaStatus::Rework;
        }
        RunEvent::QaFail => {
            next.qa_status = QaStatus::Failed;
        }
        RunEvent::StageComplete => {
            next.stages_completed.push(state.current_stage.as_str().to_string());
            next.current_stage = target;
        }
        RunEvent::UnrecoverableError => {
            next.current_stage = Stage::Failed;
            next.qa_status = QaStatus::Failed;
        }
        RunEvent::EscalationRequested => {
            next.escalation_state = EscalationState::LayoutUnknown;
        }
        RunEvent::EscalationResolved => {
            next.escalation_state = EscalationState::None;
            next.qa_status = QaStatus::Pending;
        }
    }

    Ok(next)
}

#[cfg(test)]
#[path = "machine_tests.rs"]
mod tests;
