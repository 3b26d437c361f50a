// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::recovery::RecoveryChain;
use crate::reflection::ReflectionLoop;
use chrono::{Duration, TimeZone, Utc};
use rw_adapters::{AgentError, FakeAgentBackend, FakeMessenger, FakeModelDispatch};
use rw_core::{FixedClock, STAGE_SEQUENCE};
use rw_storage::FileStateStore;
use tempfile::{tempdir, TempDir};

struct Harness {
    _dir: TempDir,
    agent: FakeAgentBackend,
    model: FakeModelDispatch,
    store: FileStateStore,
    runner: PipelineRunner<FakeAgentBackend, FakeModelDispatch, FakeMessenger, FileStateStore>,
    workspace: PathBuf,
    clock: FixedClock,
}

/// Advances the clock on every sample so `updated_at` always moves forward.
#[derive(Clone)]
struct TickingClock(FixedClock);

impl Clock for TickingClock {
    fn now_utc(&self) -> chrono::DateTime<Utc> {
        let now = self.0.now_utc();
        self.0.advance(Duration::microseconds(1));
        now
    }
}

fn seed_workflows(dir: &Path) {
    std::fs::create_dir_all(dir.join("agents")).unwrap();
    std::fs::create_dir_all(dir.join("gates")).unwrap();
    for spec in &STAGE_SPECS {
        std::fs::write(dir.join(spec.step_file), format!("# {} stage", spec.stage)).unwrap();
        std::fs::write(
            dir.join("agents").join(format!("{}.md", spec.agent)),
            format!("# {} agent", spec.agent),
        )
        .unwrap();
        std::fs::write(
            dir.join("gates").join(format!("{}.md", spec.gate)),
            format!("# {} gate criteria", spec.gate),
        )
        .unwrap();
    }
}

fn harness() -> Harness {
    let dir = tempdir().unwrap();
    let workflows = dir.path().join("workflows");
    seed_workflows(&workflows);

    let workspace = dir.path().join("workspace/runs/20260301-093000-abc123");
    std::fs::create_dir_all(workspace.join("assets")).unwrap();

    let agent = FakeAgentBackend::new();
    let model = FakeModelDispatch::new();
    let messenger = FakeMessenger::new();
    let store = FileStateStore::new(dir.path().join("workspace/runs"));
    let bus = EventBus::new();
    let journal = EventJournalWriter::new();
    bus.subscribe(Arc::new(journal.clone()));

    let clock = FixedClock::new(Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap());
    let ticking = Arc::new(TickingClock(clock.clone()));

    let stage_runner = StageRunner::new(
        ReflectionLoop::new(agent.clone(), model.clone()),
        RecoveryChain::new(agent.clone(), messenger.clone()),
        bus.clone(),
        ticking.clone(),
    );
    let runner = PipelineRunner::new(
        stage_runner,
        store.clone(),
        bus,
        journal,
        workflows,
        ticking,
    );

    Harness {
        _dir: dir,
        agent,
        model,
        store,
        runner,
        workspace,
        clock,
    }
}

fn item() -> QueueItem {
    QueueItem::new(
        "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
        42,
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap(),
    )
    .unwrap()
    .with_topic_focus("rust ownership")
}

fn pass_json(score: u8) -> String {
    format!(r#"{{"decision": "PASS", "score": {score}, "confidence": 0.9}}"#)
}

fn rework_json(score: u8) -> String {
    format!(r#"{{"decision": "REWORK", "score": {score}, "confidence": 0.5}}"#)
}

#[tokio::test]
async fn happy_path_completes_all_stages() {
    let h = harness();
    for _ in 0..8 {
        h.model.push_response(pass_json(85));
    }

    let state = h.runner.run(&item(), &h.workspace).await.unwrap();

    assert_eq!(state.current_stage, Stage::Completed);
    let expected: Vec<String> = STAGE_SEQUENCE.iter().map(|s| s.as_str().to_string()).collect();
    assert_eq!(state.stages_completed, expected);
    assert_eq!(state.escalation_state, EscalationState::None);

    // Run file persisted with the final state
    let stored = h.store.load(&state.run_id).await.unwrap().unwrap();
    assert_eq!(stored.current_stage, Stage::Completed);

    // Journal carries entered/completed pairs for all 8 stages plus the
    // run lifecycle markers
    let journal = std::fs::read_to_string(h.workspace.join("events.log")).unwrap();
    let count = |needle: &str| journal.lines().filter(|l| l.contains(needle)).count();
    assert_eq!(count("pipeline.run_started"), 1);
    assert_eq!(count("pipeline.stage_entered"), 8);
    assert_eq!(count("pipeline.stage_completed"), 8);
    assert_eq!(count("qa.gate_passed"), 8);
    assert_eq!(count("pipeline.run_completed"), 1);
}

#[tokio::test]
async fn run_id_is_the_workspace_directory_name() {
    let h = harness();
    for _ in 0..8 {
        h.model.push_response(pass_json(80));
    }
    let state = h.runner.run(&item(), &h.workspace).await.unwrap();
    assert_eq!(state.run_id.as_str(), "20260301-093000-abc123");
    assert_eq!(state.workspace_path, h.workspace.to_string_lossy());
}

#[tokio::test]
async fn router_receives_url_and_topic_in_elicitation() {
    let h = harness();
    for _ in 0..8 {
        h.model.push_response(pass_json(80));
    }
    h.runner.run(&item(), &h.workspace).await.unwrap();

    let executions = h.agent.executions();
    assert_eq!(executions.len(), 8);
    assert_eq!(
        executions[0].elicitation_context.get("youtube_url").map(String::as_str),
        Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
    );
    assert_eq!(
        executions[0].elicitation_context.get("topic_focus").map(String::as_str),
        Some("rust ownership")
    );
    // Later stages keep the topic but not the URL
    assert!(!executions[1].elicitation_context.contains_key("youtube_url"));
    assert_eq!(
        executions[1].elicitation_context.get("topic_focus").map(String::as_str),
        Some("rust ownership")
    );
}

#[tokio::test]
async fn artifacts_thread_forward_between_stages() {
    let h = harness();
    h.agent.push_result(rw_core::AgentResult::new(
        "success",
        vec![PathBuf::from("assets/router-output.json")],
    ));
    for _ in 0..8 {
        h.model.push_response(pass_json(80));
    }
    h.runner.run(&item(), &h.workspace).await.unwrap();

    let executions = h.agent.executions();
    assert!(executions[0].prior_artifacts.is_empty());
    assert_eq!(
        executions[1].prior_artifacts,
        vec![PathBuf::from("assets/router-output.json")]
    );
}

#[tokio::test]
async fn qa_exhaustion_pauses_without_failing_the_run() {
    let h = harness();
    for score in [20, 35, 30] {
        h.model.push_response(rework_json(score));
    }

    let state = h.runner.run(&item(), &h.workspace).await.unwrap();

    assert_eq!(state.current_stage, Stage::Router, "stage unchanged");
    assert_eq!(state.escalation_state, EscalationState::QaExhausted);
    assert_eq!(state.qa_status, QaStatus::Failed);
    assert!(state.stages_completed.is_empty());

    let journal = std::fs::read_to_string(h.workspace.join("events.log")).unwrap();
    assert!(journal.contains("qa.gate_failed"));
    assert!(journal.contains("pipeline.run_failed"));
    assert!(journal.contains("\"reason\":\"qa_exhausted\""));
}

#[tokio::test]
async fn unrecoverable_stage_error_fails_the_run() {
    let h = harness();
    // Reflection attempt plus all three recovery levels die
    for _ in 0..4 {
        h.agent.push_error(AgentError::Timeout { secs: 300 });
    }

    let err = h.runner.run(&item(), &h.workspace).await.unwrap_err();
    assert!(matches!(err, PipelineError::Agent(_)));

    let stored = h
        .store
        .load(&RunId::new("20260301-093000-abc123"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.current_stage, Stage::Failed);
    assert_eq!(stored.qa_status, QaStatus::Failed);
}

#[tokio::test]
async fn resume_skips_completed_stages() {
    let h = harness();
    let mut state = rw_core::test_support::run_state_at(Stage::Transcript);
    state.stages_completed = vec!["router".to_string(), "research".to_string()];
    state.workspace_path = h.workspace.to_string_lossy().into_owned();
    std::fs::write(h.workspace.join("assets/research-output.json"), "{}").unwrap();

    // Six remaining stages all pass
    for _ in 0..6 {
        h.model.push_response(pass_json(88));
    }

    let finished = h.runner.resume(state, Stage::Transcript).await.unwrap();

    assert_eq!(finished.current_stage, Stage::Completed);
    let executions = h.agent.executions();
    assert_eq!(executions.len(), 6);
    assert_eq!(executions[0].stage, "transcript");
    // Recovered workspace artifacts are offered to the resumed stage
    assert_eq!(
        executions[0].prior_artifacts,
        vec![h.workspace.join("assets/research-output.json")]
    );
}

#[tokio::test]
async fn missing_gate_criteria_is_a_distinct_error() {
    let h = harness();
    std::fs::remove_file(
        h._dir
            .path()
            .join("workflows/gates/router.md"),
    )
    .unwrap();

    let err = h.runner.run(&item(), &h.workspace).await.unwrap_err();
    assert!(matches!(err, PipelineError::GateCriteria { .. }));
}

#[tokio::test]
async fn updated_at_advances_on_every_checkpoint() {
    let h = harness();
    for _ in 0..8 {
        h.model.push_response(pass_json(85));
    }
    let started_at = h.clock.now_iso();
    let state = h.runner.run(&item(), &h.workspace).await.unwrap();
    assert!(state.updated_at > state.created_at);
    assert!(state.created_at >= started_at);
}
