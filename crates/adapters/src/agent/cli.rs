// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Executes agents and QA dispatches through an
//! external AI CLI subprocess.

use super::{prompt::build_agent_prompt, AgentError, AgentExecutionPort};
use crate::model::{DispatchError, ModelDispatchPort};
use crate::subprocess::run_with_timeout;
use async_trait::async_trait;
use rw_core::{AgentRequest, AgentResult, SessionId};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, info};

/// Final JSON object the agent process prints on stdout.
#[derive(Debug, Deserialize)]
struct AgentOutput {
    #[serde(default = "default_status")]
    status: String,
    #[serde(default)]
    artifacts: Vec<PathBuf>,
    #[serde(default)]
    session_id: String,
}

fn default_status() -> String {
    "success".to_string()
}

/// Agent and QA-model execution over one external AI CLI binary.
///
/// Each invocation is a fresh subprocess; conversation context across rework
/// attempts rides in the prompt's attempt-history section, never in backend
/// state.
#[derive(Debug, Clone)]
pub struct CliAgentBackend {
    program: String,
    work_dir: PathBuf,
    agent_timeout: Duration,
    dispatch_timeout: Duration,
}

impl CliAgentBackend {
    pub fn new(program: impl Into<String>, work_dir: impl Into<PathBuf>, agent_timeout: Duration) -> Self {
        // QA dispatches are lighter than full agent runs but still model
        // calls; floor the deadline at five minutes.
        let dispatch_timeout = agent_timeout.max(Duration::from_secs(300)) / 2;
        Self {
            program: program.into(),
            work_dir: work_dir.into(),
            agent_timeout,
            dispatch_timeout: dispatch_timeout.max(Duration::from_secs(150)),
        }
    }

    fn command(&self, prompt: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-p")
            .arg(prompt)
            .current_dir(&self.work_dir)
            .stdin(std::process::Stdio::null())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl AgentExecutionPort for CliAgentBackend {
    async fn execute(&self, request: &AgentRequest) -> Result<AgentResult, AgentError> {
        let step_content = tokio::fs::read_to_string(&request.step_file).await?;
        let agent_content = tokio::fs::read_to_string(&request.agent_definition).await?;
        let prompt = build_agent_prompt(request, &step_content, &agent_content);

        info!(stage = %request.stage, attempts = request.attempt_history.len(), "executing agent");
        let started = Instant::now();
        let output = run_with_timeout(
            self.command(&prompt),
            self.agent_timeout,
            &format!("{} agent", request.stage),
        )
        .await?;
        let duration = started.elapsed().as_secs_f64();

        if !output.status.success() {
            return Err(AgentError::NonZeroExit {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let parsed = parse_agent_output(&stdout)?;
        debug!(stage = %request.stage, artifacts = parsed.artifacts.len(), "agent finished");

        Ok(AgentResult::new(parsed.status, parsed.artifacts)
            .with_session(SessionId::new(parsed.session_id))
            .with_duration(duration))
    }
}

#[async_trait]
impl ModelDispatchPort for CliAgentBackend {
    async fn dispatch(
        &self,
        role: &str,
        prompt: &str,
        model: Option<&str>,
    ) -> Result<String, DispatchError> {
        let mut cmd = self.command(prompt);
        if let Some(model) = model {
            cmd.arg("--model").arg(model);
        }

        debug!(role, model = model.unwrap_or("default"), "dispatching model call");
        let output = run_with_timeout(cmd, self.dispatch_timeout, &format!("{role} dispatch"))
            .await
            .map_err(|e| DispatchError::Backend(e.to_string()))?;

        if !output.status.success() {
            return Err(DispatchError::Backend(format!(
                "dispatch exited with status {}: {}",
                output.status.code().unwrap_or(-1),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Extract the result object from agent stdout.
///
/// Accepts either a bare JSON object (optionally fenced) or trailing JSON on
/// the last non-empty line after free-form logging.
fn parse_agent_output(stdout: &str) -> Result<AgentOutput, AgentError> {
    let cleaned = strip_code_fences(stdout);

    if let Ok(parsed) = serde_json::from_str::<AgentOutput>(cleaned.trim()) {
        return Ok(parsed);
    }

    let last_line = cleaned
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("");
    serde_json::from_str(last_line.trim())
        .map_err(|e| AgentError::UnparseableOutput(format!("{e}: {last_line:.200}")))
}

/// Drop Markdown fence lines, keeping the fenced body.
fn strip_code_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }
    trimmed
        .lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
