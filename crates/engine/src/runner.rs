// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Drives one queue item across the stage sequence.
//!
//! State is checkpointed before every stage and after every advance, so a
//! crash at any point leaves a resumable run file behind. QA exhaustion
//! pauses the run (escalation) rather than failing it; only unrecoverable
//! stage errors transition to the terminal `failed` stage.

use crate::bus::EventBus;
use crate::error::PipelineError;
use crate::registry::{StageSpec, STAGE_SPECS};
use crate::stage_runner::StageRunner;
use rw_adapters::{AgentExecutionPort, MessagingPort, ModelDispatchPort};
use rw_core::{
    machine, names, AgentRequest, Clock, EscalationState, GateName, PipelineEvent, QaStatus,
    QueueItem, RunEvent, RunId, RunState, Stage,
};
use rw_storage::{EventJournalWriter, StateStore};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Walks the canonical stage sequence for one run.
#[derive(Clone)]
pub struct PipelineRunner<A, M, Msg, S> {
    stage_runner: StageRunner<A, M, Msg>,
    store: S,
    bus: EventBus,
    journal: EventJournalWriter,
    workflows_dir: PathBuf,
    clock: Arc<dyn Clock>,
}

impl<A, M, Msg, S> PipelineRunner<A, M, Msg, S>
where
    A: AgentExecutionPort,
    M: ModelDispatchPort,
    Msg: MessagingPort,
    S: StateStore,
{
    pub fn new(
        stage_runner: StageRunner<A, M, Msg>,
        store: S,
        bus: EventBus,
        journal: EventJournalWriter,
        workflows_dir: impl Into<PathBuf>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            stage_runner,
            store,
            bus,
            journal,
            workflows_dir: workflows_dir.into(),
            clock,
        }
    }

    /// Run a fresh queue item to completion (or pause/failure).
    ///
    /// The run id is the workspace directory name, which ties `run.md`,
    /// `events.log`, and the stage artifacts into one directory.
    pub async fn run(&self, item: &QueueItem, workspace: &Path) -> Result<RunState, PipelineError> {
        let run_id = RunId::new(
            workspace
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.clock.now_iso()),
        );
        let state = RunState::new(
            run_id,
            &item.url,
            workspace.to_string_lossy(),
            self.clock.now_iso(),
        )?;
        self.journal.route_to(workspace.join("events.log"));
        self.store.save(&state).await?;

        self.bus
            .publish(
                &PipelineEvent::new(self.clock.now_iso(), names::RUN_STARTED, None)
                    .with_data("run_id", state.run_id.as_str())
                    .with_data("url", item.url.as_str()),
            )
            .await;

        self.execute(state, Vec::new(), item.topic_focus.as_deref())
            .await
    }

    /// Resume an interrupted run at the given stage.
    ///
    /// Stages already listed in `stages_completed` are skipped; artifacts
    /// from completed stages are recovered from the workspace's `assets/`
    /// directory.
    pub async fn resume(
        &self,
        state: RunState,
        resume_from: Stage,
    ) -> Result<RunState, PipelineError> {
        info!(run_id = %state.run_id, stage = %resume_from, "resuming run");
        let workspace = PathBuf::from(&state.workspace_path);
        self.journal.route_to(workspace.join("events.log"));

        let artifacts = existing_artifacts(&workspace).await;
        self.execute(state, artifacts, None).await
    }

    async fn execute(
        &self,
        mut state: RunState,
        mut artifacts: Vec<PathBuf>,
        topic_focus: Option<&str>,
    ) -> Result<RunState, PipelineError> {
        for spec in &STAGE_SPECS {
            if state.stages_completed.iter().any(|s| s == spec.stage.as_str()) {
                continue;
            }

            // Checkpoint before entering the stage
            self.store.save(&state).await?;

            let request = self.build_request(spec, &state, &artifacts, topic_focus);
            let criteria = self.load_gate_criteria(spec).await?;
            let gate = GateName::new(spec.gate);

            let result = match self.stage_runner.run_stage(&request, &gate, &criteria).await {
                Ok(result) => result,
                Err(err) => {
                    state = machine::apply(&state, RunEvent::UnrecoverableError, self.clock.as_ref())?;
                    self.store.save(&state).await?;
                    return Err(err);
                }
            };

            if result.escalation_needed {
                return self.pause_exhausted(state, spec, result.best_critique.score).await;
            }

            artifacts.extend(result.artifacts.iter().cloned());

            self.bus
                .publish(
                    &PipelineEvent::new(
                        self.clock.now_iso(),
                        names::GATE_PASSED,
                        Some(spec.stage),
                    )
                    .with_data("score", result.best_critique.score),
                )
                .await;

            let event = if spec.stage == Stage::Delivery {
                RunEvent::StageComplete
            } else {
                RunEvent::QaPass
            };
            state = machine::apply(&state, event, self.clock.as_ref())?;
            self.store.save(&state).await?;
        }

        self.bus
            .publish(
                &PipelineEvent::new(self.clock.now_iso(), names::RUN_COMPLETED, None)
                    .with_data("run_id", state.run_id.as_str()),
            )
            .await;
        info!(run_id = %state.run_id, "run completed");
        Ok(state)
    }

    /// QA attempts exhausted below the pass floor: pause the run for the
    /// user instead of failing it.
    async fn pause_exhausted(
        &self,
        mut state: RunState,
        spec: &StageSpec,
        best_score: u8,
    ) -> Result<RunState, PipelineError> {
        warn!(run_id = %state.run_id, stage = %spec.stage, best_score, "QA exhausted, pausing run");

        state.escalation_state = EscalationState::QaExhausted;
        state.qa_status = QaStatus::Failed;
        state.updated_at = self.clock.now_iso();
        self.store.save(&state).await?;

        self.bus
            .publish(
                &PipelineEvent::new(self.clock.now_iso(), names::GATE_FAILED, Some(spec.stage))
                    .with_data("score", best_score),
            )
            .await;
        self.bus
            .publish(
                &PipelineEvent::new(self.clock.now_iso(), names::RUN_FAILED, Some(spec.stage))
                    .with_data("reason", "qa_exhausted"),
            )
            .await;
        Ok(state)
    }

    fn build_request(
        &self,
        spec: &StageSpec,
        state: &RunState,
        artifacts: &[PathBuf],
        topic_focus: Option<&str>,
    ) -> AgentRequest {
        let mut elicitation = BTreeMap::new();
        if let Some(topic) = topic_focus {
            elicitation.insert("topic_focus".to_string(), topic.to_string());
        }
        if spec.stage == Stage::Router {
            elicitation.insert("youtube_url".to_string(), state.youtube_url.clone());
        }

        AgentRequest::new(
            spec.stage,
            spec.step_path(&self.workflows_dir),
            spec.agent_path(&self.workflows_dir),
        )
        .with_prior_artifacts(artifacts.to_vec())
        .with_elicitation(elicitation)
    }

    async fn load_gate_criteria(&self, spec: &StageSpec) -> Result<String, PipelineError> {
        let path = spec.gate_path(&self.workflows_dir);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| PipelineError::GateCriteria {
                gate: spec.gate.to_string(),
                source,
            })
    }
}

/// Artifacts left behind by completed stages, recovered for a resume.
async fn existing_artifacts(workspace: &Path) -> Vec<PathBuf> {
    let assets = workspace.join("assets");
    let Ok(mut entries) = tokio::fs::read_dir(&assets).await else {
        return Vec::new();
    };
    let mut files = Vec::new();
    while let Ok(Some(entry)) = entries.next_entry().await {
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    files
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
