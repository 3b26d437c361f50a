// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake agent backend for deterministic testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{AgentError, AgentExecutionPort};
use async_trait::async_trait;
use parking_lot::Mutex;
use rw_core::{AgentRequest, AgentResult};
use std::collections::{BTreeMap, VecDeque};
use std::path::PathBuf;
use std::sync::Arc;

/// Snapshot of one `execute` call.
#[derive(Debug, Clone)]
pub struct RecordedExecution {
    pub stage: String,
    pub attempt_history_len: usize,
    pub prior_artifacts: Vec<PathBuf>,
    pub elicitation_context: BTreeMap<String, String>,
}

/// Scripted agent backend: returns queued outcomes in order and records
/// every request it saw.
///
/// When the script runs dry, executions succeed with an empty artifact list.
#[derive(Clone, Default)]
pub struct FakeAgentBackend {
    inner: Arc<Mutex<FakeAgentState>>,
}

#[derive(Default)]
struct FakeAgentState {
    script: VecDeque<Result<AgentResult, AgentError>>,
    executions: Vec<RecordedExecution>,
}

impl FakeAgentBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the outcome for the next execution.
    pub fn push_result(&self, result: AgentResult) {
        self.inner.lock().script.push_back(Ok(result));
    }

    /// Queue a failure for the next execution.
    pub fn push_error(&self, error: AgentError) {
        self.inner.lock().script.push_back(Err(error));
    }

    /// All recorded executions, in call order.
    pub fn executions(&self) -> Vec<RecordedExecution> {
        self.inner.lock().executions.clone()
    }

    pub fn execution_count(&self) -> usize {
        self.inner.lock().executions.len()
    }
}

#[async_trait]
impl AgentExecutionPort for FakeAgentBackend {
    async fn execute(&self, request: &AgentRequest) -> Result<AgentResult, AgentError> {
        let mut inner = self.inner.lock();
        inner.executions.push(RecordedExecution {
            stage: request.stage.as_str().to_string(),
            attempt_history_len: request.attempt_history.len(),
            prior_artifacts: request.prior_artifacts.clone(),
            elicitation_context: request.elicitation_context.clone(),
        });
        match inner.script.pop_front() {
            Some(outcome) => outcome,
            None => Ok(AgentResult::new("success", Vec::new())),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
