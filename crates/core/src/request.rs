// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent execution input and output bundles

use crate::id::SessionId;
use crate::stage::Stage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// One attempt-history entry: flat string map summarizing a prior attempt's
/// decision, score, blockers, and prescriptive fixes.
pub type AttemptEntry = BTreeMap<String, String>;

/// Everything an agent needs for one execution.
///
/// The reflection loop never mutates agent state; structured feedback rides
/// across retries by rebuilding the request with an extended
/// `attempt_history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRequest {
    pub stage: Stage,
    /// Stage-description file; opaque to the core
    pub step_file: PathBuf,
    /// Agent-persona file; opaque to the core
    pub agent_definition: PathBuf,
    /// Outputs of earlier stages, by path only
    pub prior_artifacts: Vec<PathBuf>,
    /// User preferences collected by the router stage
    pub elicitation_context: BTreeMap<String, String>,
    pub attempt_history: Vec<AttemptEntry>,
}

impl AgentRequest {
    pub fn new(stage: Stage, step_file: PathBuf, agent_definition: PathBuf) -> Self {
        Self {
            stage,
            step_file,
            agent_definition,
            prior_artifacts: Vec::new(),
            elicitation_context: BTreeMap::new(),
            attempt_history: Vec::new(),
        }
    }

    pub fn with_prior_artifacts(mut self, artifacts: Vec<PathBuf>) -> Self {
        self.prior_artifacts = artifacts;
        self
    }

    pub fn with_elicitation(mut self, context: BTreeMap<String, String>) -> Self {
        self.elicitation_context = context;
        self
    }

    /// New request with one more attempt-history entry appended.
    pub fn with_history_entry(&self, entry: AttemptEntry) -> Self {
        let mut next = self.clone();
        next.attempt_history.push(entry);
        next
    }

    /// Fork: keep prior artifacts, clear attempt history. Signals the
    /// backend to start a fresh conversation.
    pub fn forked(&self) -> Self {
        let mut next = self.clone();
        next.attempt_history.clear();
        next
    }

    /// Fresh: clear both prior artifacts and attempt history.
    pub fn fresh(&self) -> Self {
        let mut next = self.clone();
        next.prior_artifacts.clear();
        next.attempt_history.clear();
        next
    }
}

/// Output from a completed agent execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResult {
    pub status: String,
    /// Produced artifact paths, in creation order
    pub artifacts: Vec<PathBuf>,
    pub session_id: SessionId,
    pub duration_seconds: f64,
}

impl AgentResult {
    pub fn new(status: impl Into<String>, artifacts: Vec<PathBuf>) -> Self {
        Self {
            status: status.into(),
            artifacts,
            session_id: SessionId::default(),
            duration_seconds: 0.0,
        }
    }

    pub fn with_session(mut self, session_id: SessionId) -> Self {
        self.session_id = session_id;
        self
    }

    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration_seconds = seconds.max(0.0);
        self
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
