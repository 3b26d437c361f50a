// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn request_with_context() -> AgentRequest {
    let mut elicitation = BTreeMap::new();
    elicitation.insert("topic_focus".to_string(), "rust async".to_string());
    let mut entry = AttemptEntry::new();
    entry.insert("attempt".to_string(), "1".to_string());
    entry.insert("decision".to_string(), "REWORK".to_string());

    AgentRequest::new(
        Stage::Content,
        PathBuf::from("workflows/stage-04-content.md"),
        PathBuf::from("workflows/agents/content-creator.md"),
    )
    .with_prior_artifacts(vec![PathBuf::from("assets/moment-selection.json")])
    .with_elicitation(elicitation)
    .with_history_entry(entry)
}

#[test]
fn with_history_entry_appends_without_mutating_original() {
    let base = request_with_context();
    let mut entry = AttemptEntry::new();
    entry.insert("attempt".to_string(), "2".to_string());
    let extended = base.with_history_entry(entry);
    assert_eq!(base.attempt_history.len(), 1);
    assert_eq!(extended.attempt_history.len(), 2);
}

#[test]
fn forked_keeps_artifacts_and_drops_history() {
    let forked = request_with_context().forked();
    assert_eq!(forked.prior_artifacts.len(), 1);
    assert!(forked.attempt_history.is_empty());
    assert_eq!(forked.elicitation_context.len(), 1);
}

#[test]
fn fresh_drops_artifacts_and_history() {
    let fresh = request_with_context().fresh();
    assert!(fresh.prior_artifacts.is_empty());
    assert!(fresh.attempt_history.is_empty());
    assert_eq!(fresh.stage, Stage::Content);
}

#[test]
fn result_duration_is_clamped_non_negative() {
    let result = AgentResult::new("success", vec![]).with_duration(-3.0);
    assert_eq!(result.duration_seconds, 0.0);
}

#[test]
fn result_roundtrips_through_json() {
    let result = AgentResult::new("success", vec![PathBuf::from("assets/content.json")])
        .with_session(SessionId::new("sess-9"))
        .with_duration(12.5);
    let json = serde_json::to_string(&result).unwrap();
    let parsed: AgentResult = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, result);
}
