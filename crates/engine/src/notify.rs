// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-facing progress messages derived from pipeline events

use async_trait::async_trait;
use rw_adapters::MessagingPort;
use rw_core::{names, EventListener, ListenerError, PipelineEvent, TOTAL_STAGES};

/// Events that produce a chat message.
const NOTIFY_EVENTS: [&str; 7] = [
    names::STAGE_ENTERED,
    names::STAGE_COMPLETED,
    names::RUN_COMPLETED,
    names::RUN_FAILED,
    names::GATE_PASSED,
    names::GATE_FAILED,
    names::ESCALATED,
];

/// Bus listener that relays selected events to the messaging port.
#[derive(Clone)]
pub struct ChatNotifier<Msg> {
    messaging: Msg,
}

impl<Msg> ChatNotifier<Msg>
where
    Msg: MessagingPort,
{
    pub fn new(messaging: Msg) -> Self {
        Self { messaging }
    }
}

#[async_trait]
impl<Msg> EventListener for ChatNotifier<Msg>
where
    Msg: MessagingPort,
{
    async fn handle(&self, event: &PipelineEvent) -> Result<(), ListenerError> {
        if !NOTIFY_EVENTS.contains(&event.name.as_str()) {
            return Ok(());
        }
        let message = format_message(event);
        self.messaging
            .notify(&message)
            .await
            .map_err(|e| ListenerError::new(e.to_string()))
    }
}

/// Render a pipeline event as a user-friendly chat message.
pub fn format_message(event: &PipelineEvent) -> String {
    let stage_name = event.stage.map(|s| s.as_str()).unwrap_or("unknown");
    let stage_number = event
        .stage
        .and_then(|s| s.number())
        .map(|n| n.to_string())
        .unwrap_or_else(|| "?".to_string());
    let data = |key: &str| {
        event
            .data
            .get(key)
            .map(|v| match v {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
    };

    match event.name.as_str() {
        names::STAGE_ENTERED => {
            format!("Processing stage {stage_number}/{TOTAL_STAGES}: {stage_name}...")
        }
        names::STAGE_COMPLETED => format!("Stage {stage_name} completed."),
        names::RUN_COMPLETED => "Pipeline completed successfully!".to_string(),
        names::RUN_FAILED => format!(
            "Pipeline failed: {}",
            data("reason").unwrap_or_else(|| "unknown error".to_string())
        ),
        names::GATE_PASSED => format!(
            "QA gate {stage_name}: PASS (score: {}/100)",
            data("score").unwrap_or_else(|| "?".to_string())
        ),
        names::GATE_FAILED => format!(
            "QA gate {stage_name}: FAIL (score: {}/100)",
            data("score").unwrap_or_else(|| "?".to_string())
        ),
        names::ESCALATED => format!(
            "Pipeline needs help: {}",
            data("description").unwrap_or_else(|| "Unknown issue".to_string())
        ),
        other => format!("Pipeline event: {other}"),
    }
}

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
