// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Observability events and the listener contract

use crate::stage::Stage;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Dotted event names published on the bus.
pub mod names {
    pub const RUN_STARTED: &str = "pipeline.run_started";
    pub const RUN_COMPLETED: &str = "pipeline.run_completed";
    pub const RUN_FAILED: &str = "pipeline.run_failed";
    pub const STAGE_ENTERED: &str = "pipeline.stage_entered";
    pub const STAGE_COMPLETED: &str = "pipeline.stage_completed";
    pub const GATE_PASSED: &str = "qa.gate_passed";
    pub const GATE_FAILED: &str = "qa.gate_failed";
    pub const ESCALATED: &str = "error.escalated";
}

/// Structured event emitted for observability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineEvent {
    /// ISO-8601 UTC
    pub timestamp: String,
    /// Dotted name, e.g. `pipeline.stage_completed`
    pub name: String,
    pub stage: Option<Stage>,
    /// Event-specific payload
    pub data: Map<String, Value>,
}

impl PipelineEvent {
    pub fn new(timestamp: impl Into<String>, name: impl Into<String>, stage: Option<Stage>) -> Self {
        Self {
            timestamp: timestamp.into(),
            name: name.into(),
            stage,
            data: Map::new(),
        }
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}

/// Failure inside an event listener; logged by the bus and swallowed.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ListenerError(pub String);

impl ListenerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<std::io::Error> for ListenerError {
    fn from(err: std::io::Error) -> Self {
        Self(err.to_string())
    }
}

impl From<serde_json::Error> for ListenerError {
    fn from(err: serde_json::Error) -> Self {
        Self(err.to_string())
    }
}

/// Receiver of every event published on the bus.
///
/// A failing listener must never starve the others and must never propagate
/// into the publisher.
#[async_trait]
pub trait EventListener: Send + Sync {
    async fn handle(&self, event: &PipelineEvent) -> Result<(), ListenerError>;
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
