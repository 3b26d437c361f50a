// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! RunState <-> YAML front-matter in run.md files

use rw_core::{EscalationState, QaStatus, RunId, RunState, Stage, ValidationError};
use serde::{Deserialize, Serialize};

/// Front-matter schema. Key names are the on-disk contract and must stay
/// stable; `RunState` field names track them.
#[derive(Debug, Serialize, Deserialize)]
struct Frontmatter {
    run_id: String,
    youtube_url: String,
    current_stage: Stage,
    current_attempt: u32,
    qa_status: QaStatus,
    #[serde(default)]
    stages_completed: Vec<String>,
    escalation_state: EscalationState,
    #[serde(default)]
    best_of_three_overrides: Vec<String>,
    #[serde(default)]
    created_at: String,
    #[serde(default)]
    updated_at: String,
    #[serde(default)]
    workspace_path: String,
}

/// Serialize a run state to a `---`-delimited YAML front-matter block.
///
/// Free-form markdown may follow the block in run.md; it is never read back.
pub fn serialize_run_state(state: &RunState) -> Result<String, ValidationError> {
    let fm = Frontmatter {
        run_id: state.run_id.as_str().to_string(),
        youtube_url: state.youtube_url.clone(),
        current_stage: state.current_stage,
        current_attempt: state.current_attempt,
        qa_status: state.qa_status,
        stages_completed: state.stages_completed.clone(),
        escalation_state: state.escalation_state,
        best_of_three_overrides: state.best_of_three_overrides.clone(),
        created_at: state.created_at.clone(),
        updated_at: state.updated_at.clone(),
        workspace_path: state.workspace_path.clone(),
    };
    let body = serde_yaml::to_string(&fm)
        .map_err(|e| ValidationError::new(format!("front-matter serialization failed: {e}")))?;
    Ok(format!("---\n{body}---\n"))
}

/// Parse run.md content back into a [`RunState`].
///
/// Fails with a [`ValidationError`] when the delimiters are missing or the
/// YAML is malformed; never returns a partial state.
pub fn deserialize_run_state(content: &str) -> Result<RunState, ValidationError> {
    if !content.starts_with("---") {
        return Err(ValidationError::new(
            "missing YAML front-matter delimiters (---)",
        ));
    }

    let mut parts = content.splitn(3, "---");
    parts.next(); // leading empty segment
    let raw = match (parts.next(), parts.next()) {
        (Some(block), Some(_rest)) => block,
        _ => {
            return Err(ValidationError::new(
                "missing YAML front-matter delimiters (---)",
            ))
        }
    };

    let fm: Frontmatter = serde_yaml::from_str(raw)
        .map_err(|e| ValidationError::new(format!("invalid front-matter: {e}")))?;

    let state = RunState {
        run_id: RunId::new(fm.run_id),
        youtube_url: fm.youtube_url,
        current_stage: fm.current_stage,
        current_attempt: fm.current_attempt,
        qa_status: fm.qa_status,
        stages_completed: fm.stages_completed,
        escalation_state: fm.escalation_state,
        best_of_three_overrides: fm.best_of_three_overrides,
        created_at: fm.created_at,
        updated_at: fm.updated_at,
        workspace_path: fm.workspace_path,
    };
    state.validate()?;
    Ok(state)
}

#[cfg(test)]
#[path = "frontmatter_tests.rs"]
mod tests;
