// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runs one stage's agent as a subprocess.
//!
//! The backend must not leak state between invocations; anything the next
//! attempt needs travels in the request's `attempt_history`.

mod cli;
pub mod prompt;

pub use cli::CliAgentBackend;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeAgentBackend, RecordedExecution};

use crate::subprocess::SubprocessError;
use async_trait::async_trait;
use rw_core::{AgentRequest, AgentResult};
use thiserror::Error;

/// Errors from agent execution. All variants enter the recovery chain.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent timed out after {secs}s")]
    Timeout { secs: u64 },
    #[error("agent spawn failed: {0}")]
    Spawn(std::io::Error),
    #[error("agent exited with status {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },
    #[error("unparseable agent output: {0}")]
    UnparseableOutput(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SubprocessError> for AgentError {
    fn from(err: SubprocessError) -> Self {
        match err {
            SubprocessError::TimedOut { secs, .. } => AgentError::Timeout { secs },
            SubprocessError::Io { source, .. } => AgentError::Spawn(source),
        }
    }
}

/// Execute an agent and collect its produced artifacts.
#[async_trait]
pub trait AgentExecutionPort: Clone + Send + Sync + 'static {
    async fn execute(&self, request: &AgentRequest) -> Result<AgentResult, AgentError>;
}
