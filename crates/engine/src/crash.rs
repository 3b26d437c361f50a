// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Turns persisted run state into resume plans at startup

use rw_adapters::MessagingPort;
use rw_core::{RunState, Stage, STAGE_SEQUENCE, TOTAL_STAGES};
use rw_storage::{StateStore, StateStoreError};
use tracing::{error, info, warn};

/// How to resume one interrupted run.
#[derive(Debug, Clone)]
pub struct RecoveryPlan {
    pub run_state: RunState,
    pub resume_from: Stage,
    pub stages_remaining: Vec<Stage>,
    pub stages_already_done: usize,
}

/// Scans the state store for incomplete runs and notifies the user that
/// each is resuming.
#[derive(Clone)]
pub struct CrashRecovery<S, Msg> {
    store: S,
    messaging: Msg,
}

impl<S, Msg> CrashRecovery<S, Msg>
where
    S: StateStore,
    Msg: MessagingPort,
{
    pub fn new(store: S, messaging: Msg) -> Self {
        Self { store, messaging }
    }

    /// Build recovery plans for every resumable run.
    ///
    /// Inconsistent runs (every stage completed yet not terminal) are
    /// skipped with a warning. Notifications are best-effort.
    pub async fn scan(&self) -> Result<Vec<RecoveryPlan>, StateStoreError> {
        let incomplete = self.store.list_incomplete().await?;
        if incomplete.is_empty() {
            info!("no interrupted runs found, clean startup");
            return Ok(Vec::new());
        }

        let mut plans = Vec::new();
        for run_state in incomplete {
            let Some(plan) = build_plan(run_state) else {
                continue;
            };
            self.notify_resume(&plan).await;
            plans.push(plan);
        }

        info!(count = plans.len(), "interrupted runs to resume");
        Ok(plans)
    }

    async fn notify_resume(&self, plan: &RecoveryPlan) {
        let message = format!(
            "Resuming your run from {} ({} of {} stages already completed)",
            plan.resume_from, plan.stages_already_done, TOTAL_STAGES
        );
        if let Err(err) = self.messaging.notify(&message).await {
            error!(run_id = %plan.run_state.run_id, error = %err, "failed to send recovery notification");
        }
    }
}

/// Resume point: the first canonical stage not in `stages_completed`.
fn build_plan(run_state: RunState) -> Option<RecoveryPlan> {
    let completed: std::collections::BTreeSet<&str> = run_state
        .stages_completed
        .iter()
        .map(String::as_str)
        .filter(|name| STAGE_SEQUENCE.iter().any(|s| s.as_str() == *name))
        .collect();

    let remaining: Vec<Stage> = STAGE_SEQUENCE
        .iter()
        .copied()
        .filter(|stage| !completed.contains(&stage.as_str()))
        .collect();

    let Some(resume_from) = remaining.first().copied() else {
        warn!(
            run_id = %run_state.run_id,
            "run has all stages completed but is not terminal, skipping"
        );
        return None;
    };

    Some(RecoveryPlan {
        stages_already_done: completed.len(),
        stages_remaining: remaining,
        resume_from,
        run_state,
    })
}

#[cfg(test)]
#[path = "crash_tests.rs"]
mod tests;
