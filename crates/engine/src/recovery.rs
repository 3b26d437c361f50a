// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ordered rescue strategies for a raised stage.
//!
//! Levels walk from least to most disruptive: plain retry, fork to a fresh
//! session (attempt history cleared), fresh start (prior artifacts cleared
//! too), then escalation to the user.

use rw_adapters::{AgentExecutionPort, MessagingPort};
use rw_core::{AgentRequest, AgentResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{error, info, warn};

/// Ordered recovery levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryLevel {
    Retry,
    Fork,
    Fresh,
    Escalate,
}

impl RecoveryLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecoveryLevel::Retry => "retry",
            RecoveryLevel::Fork => "fork",
            RecoveryLevel::Fresh => "fresh",
            RecoveryLevel::Escalate => "escalate",
        }
    }
}

impl fmt::Display for RecoveryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Walk order; escalation is always last.
pub const RECOVERY_ORDER: [RecoveryLevel; 4] = [
    RecoveryLevel::Retry,
    RecoveryLevel::Fork,
    RecoveryLevel::Fresh,
    RecoveryLevel::Escalate,
];

/// Outcome of a recovery walk.
#[derive(Debug, Clone)]
pub struct RecoveryOutcome {
    pub success: bool,
    /// Level that succeeded, or `Escalate` when the chain is exhausted
    pub level: RecoveryLevel,
    pub result: Option<AgentResult>,
    pub escalation_message: String,
}

/// Attempts each level in order until one rescues the stage.
#[derive(Clone)]
pub struct RecoveryChain<A, Msg> {
    agent: A,
    messaging: Msg,
}

impl<A, Msg> RecoveryChain<A, Msg>
where
    A: AgentExecutionPort,
    Msg: MessagingPort,
{
    pub fn new(agent: A, messaging: Msg) -> Self {
        Self { agent, messaging }
    }

    /// Attempt recovery for a stage whose reflection loop raised.
    ///
    /// `error_text` is the rendered failure that triggered the chain; it
    /// travels into the escalation message.
    pub async fn recover(&self, request: &AgentRequest, error_text: &str) -> RecoveryOutcome {
        warn!(stage = %request.stage, error = error_text, "recovery chain triggered");

        for level in RECOVERY_ORDER {
            if level == RecoveryLevel::Escalate {
                break;
            }

            let attempt = match level {
                RecoveryLevel::Retry => request.clone(),
                RecoveryLevel::Fork => request.forked(),
                RecoveryLevel::Fresh => request.fresh(),
                RecoveryLevel::Escalate => unreachable!("handled above"),
            };

            match self.agent.execute(&attempt).await {
                Ok(result) => {
                    info!(stage = %request.stage, level = %level, "recovery succeeded");
                    return RecoveryOutcome {
                        success: true,
                        level,
                        result: Some(result),
                        escalation_message: String::new(),
                    };
                }
                Err(err) => {
                    warn!(stage = %request.stage, level = %level, error = %err, "recovery level failed");
                }
            }
        }

        self.escalate(request, error_text).await
    }

    async fn escalate(&self, request: &AgentRequest, error_text: &str) -> RecoveryOutcome {
        let message = format!(
            "Pipeline needs help: Stage '{}' failed after all recovery attempts.\n\
             Error: {error_text}\n\
             The pipeline is paused awaiting your guidance.",
            request.stage
        );

        if let Err(err) = self.messaging.notify(&message).await {
            error!(error = %err, "failed to send escalation notification");
        }

        error!(stage = %request.stage, "recovery chain exhausted, escalating");
        RecoveryOutcome {
            success: false,
            level: RecoveryLevel::Escalate,
            result: None,
            escalation_message: message,
        }
    }
}

#[cfg(test)]
#[path = "recovery_tests.rs"]
mod tests;
