// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-run state persisted as front-matter in run.md

use crate::error::ValidationError;
use crate::id::RunId;
use crate::qa::QaStatus;
use crate::stage::Stage;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pipeline-level escalation flags.
///
/// Escalation is a pause, not a failure: an escalated run keeps its queue
/// file in `processing/` and stays on its current stage until resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationState {
    None,
    LayoutUnknown,
    QaExhausted,
    ErrorEscalated,
}

impl EscalationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EscalationState::None => "none",
            EscalationState::LayoutUnknown => "layout_unknown",
            EscalationState::QaExhausted => "qa_exhausted",
            EscalationState::ErrorEscalated => "error_escalated",
        }
    }
}

impl fmt::Display for EscalationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical record of one run. Immutable; the state machine returns a new
/// value on every transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    pub run_id: RunId,
    pub youtube_url: String,
    pub current_stage: Stage,
    pub current_attempt: u32,
    pub qa_status: QaStatus,
    /// Stage names appended on each forward transition, in order
    pub stages_completed: Vec<String>,
    pub escalation_state: EscalationState,
    /// Stages where the user accepted a below-threshold best-of-three result
    pub best_of_three_overrides: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
    pub workspace_path: String,
}

impl RunState {
    /// Build the initial state for a fresh run at the router stage.
    pub fn new(
        run_id: RunId,
        youtube_url: impl Into<String>,
        workspace_path: impl Into<String>,
        created_at: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let created_at = created_at.into();
        let state = Self {
            run_id,
            youtube_url: youtube_url.into(),
            current_stage: Stage::Router,
            current_attempt: 1,
            qa_status: QaStatus::Pending,
            stages_completed: Vec::new(),
            escalation_state: EscalationState::None,
            best_of_three_overrides: Vec::new(),
            updated_at: created_at.clone(),
            created_at,
            workspace_path: workspace_path.into(),
        };
        state.validate()?;
        Ok(state)
    }

    /// Field-level invariants shared by construction and deserialization.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.run_id.is_empty() {
            return Err(ValidationError::new("run_id must not be empty"));
        }
        if self.youtube_url.is_empty() {
            return Err(ValidationError::new("youtube_url must not be empty"));
        }
        if self.current_attempt < 1 {
            return Err(ValidationError::new(format!(
                "current_attempt must be >= 1, got {}",
                self.current_attempt
            )));
        }
        Ok(())
    }

    /// True when the run has reached `completed` or `failed`.
    pub fn is_terminal(&self) -> bool {
        self.current_stage.is_terminal()
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
