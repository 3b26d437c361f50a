// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runs one stage through execute -> QA -> recovery.
//!
//! State machine transitions stay with the caller; this layer only glues
//! the reflection loop, the recovery chain, and the event bus.

use crate::bus::EventBus;
use crate::error::PipelineError;
use crate::recovery::RecoveryChain;
use crate::reflection::ReflectionLoop;
use rw_adapters::{AgentExecutionPort, MessagingPort, ModelDispatchPort};
use rw_core::{names, AgentRequest, Clock, GateName, PipelineEvent, ReflectionResult};
use std::sync::Arc;
use tracing::{error, info};

/// Runs a single stage through the full QA and recovery cycle.
#[derive(Clone)]
pub struct StageRunner<A, M, Msg> {
    reflection: ReflectionLoop<A, M>,
    recovery: RecoveryChain<A, Msg>,
    bus: EventBus,
    clock: Arc<dyn Clock>,
}

impl<A, M, Msg> StageRunner<A, M, Msg>
where
    A: AgentExecutionPort,
    M: ModelDispatchPort,
    Msg: MessagingPort,
{
    pub fn new(
        reflection: ReflectionLoop<A, M>,
        recovery: RecoveryChain<A, Msg>,
        bus: EventBus,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            reflection,
            recovery,
            bus,
            clock,
        }
    }

    /// Execute a stage, rescuing one reflection failure through the
    /// recovery chain before giving up.
    pub async fn run_stage(
        &self,
        request: &AgentRequest,
        gate: &GateName,
        gate_criteria: &str,
    ) -> Result<ReflectionResult, PipelineError> {
        let stage = request.stage;
        info!(stage = %stage, "starting stage");

        self.bus
            .publish(&PipelineEvent::new(
                self.clock.now_iso(),
                names::STAGE_ENTERED,
                Some(stage),
            ))
            .await;

        let result = match self.reflection.run(request, gate, gate_criteria).await {
            Ok(result) => result,
            Err(err) if err.is_recoverable() => {
                error!(stage = %stage, error = %err, "stage failed, entering recovery");
                let outcome = self.recovery.recover(request, &err.to_string()).await;
                if !outcome.success {
                    self.publish_run_failed(request, &err).await;
                    return Err(err);
                }

                info!(stage = %stage, level = %outcome.level, "recovery succeeded, re-running stage");
                match self.reflection.run(request, gate, gate_criteria).await {
                    Ok(result) => result,
                    Err(second) => {
                        error!(stage = %stage, error = %second, "stage failed after recovery");
                        self.publish_run_failed(request, &second).await;
                        return Err(second);
                    }
                }
            }
            Err(err) => {
                self.publish_run_failed(request, &err).await;
                return Err(err);
            }
        };

        self.bus
            .publish(
                &PipelineEvent::new(self.clock.now_iso(), names::STAGE_COMPLETED, Some(stage))
                    .with_data("score", result.best_critique.score)
                    .with_data("decision", result.best_critique.decision.as_str()),
            )
            .await;

        info!(
            stage = %stage,
            decision = %result.best_critique.decision,
            score = result.best_critique.score,
            "stage completed"
        );
        Ok(result)
    }

    async fn publish_run_failed(&self, request: &AgentRequest, err: &PipelineError) {
        self.bus
            .publish(
                &PipelineEvent::new(
                    self.clock.now_iso(),
                    names::RUN_FAILED,
                    Some(request.stage),
                )
                .with_data("reason", err.to_string()),
            )
            .await;
    }
}

#[cfg(test)]
#[path = "stage_runner_tests.rs"]
mod tests;
