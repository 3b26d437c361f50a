// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine-wide error type

use crate::layout::LayoutError;
use crate::reflection::QaError;
use rw_adapters::{AgentError, DispatchError};
use rw_core::ValidationError;
use rw_storage::{QueueError, StateStoreError, WorkspaceError};
use thiserror::Error;

/// Errors that can abort or pause a pipeline run.
///
/// Each source kind stays distinguishable so the propagation policy can
/// treat them differently: agent and QA failures enter the recovery chain,
/// validation failures never retry, store and I/O failures abort the run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("agent execution failed: {0}")]
    Agent(#[from] AgentError),
    #[error("QA evaluation failed: {0}")]
    Qa(#[from] QaError),
    #[error("model dispatch failed: {0}")]
    Dispatch(#[from] DispatchError),
    #[error("state store failure: {0}")]
    Store(#[from] StateStoreError),
    #[error("queue failure: {0}")]
    Queue(#[from] QueueError),
    #[error("workspace failure: {0}")]
    Workspace(#[from] WorkspaceError),
    #[error("validation failure: {0}")]
    Validation(#[from] ValidationError),
    #[error("unknown layout: {0}")]
    UnknownLayout(#[from] LayoutError),
    #[error("gate criteria unavailable for '{gate}': {source}")]
    GateCriteria {
        gate: String,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Whether the recovery chain should be attempted for this error.
    ///
    /// Agent, QA, dispatch, and I/O failures are recoverable by re-running
    /// the agent; the rest propagate directly.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PipelineError::Agent(_)
                | PipelineError::Qa(_)
                | PipelineError::Dispatch(_)
                | PipelineError::Io(_)
        )
    }
}
