// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The daemon's top-level event loop.
//!
//! Startup: resume interrupted runs serially, run one retention-cleaner
//! pass, signal readiness, start the heartbeat. Steady state: poll chat
//! intake, claim the next queue item, gate on resources, run the pipeline.
//! Shutdown signals take effect between runs, never mid-stage.

use crate::heartbeat::{HeartbeatHandle, WatchdogHeartbeat};
use crate::intake::SubmissionIntake;
use rw_adapters::{
    AgentExecutionPort, ChatPollerPort, MessagingPort, ModelDispatchPort, ResourceMonitorPort,
    WatchdogPort,
};
use rw_core::{EscalationState, QueueItem};
use rw_engine::{CrashRecovery, PipelineRunner, ResourceThrottler};
use rw_storage::{FileQueue, RunCleaner, StateStore, WorkspaceManager};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info, warn};

/// Sleep between polls when the queue is empty.
const IDLE_SLEEP: Duration = Duration::from_secs(5);

/// Top-level daemon loop over the queue, pipeline, and watchdog.
pub struct ConsumerLoop<A, M, Msg, S, R, P, W> {
    queue: FileQueue,
    workspaces: WorkspaceManager,
    runner: PipelineRunner<A, M, Msg, S>,
    crash: CrashRecovery<S, Msg>,
    throttler: ResourceThrottler<R, Msg>,
    intake: SubmissionIntake<P, Msg>,
    cleaner: RunCleaner,
    messaging: Msg,
    heartbeat: WatchdogHeartbeat<W>,
    watchdog: W,
    idle_sleep: Duration,
}

impl<A, M, Msg, S, R, P, W> ConsumerLoop<A, M, Msg, S, R, P, W>
where
    A: AgentExecutionPort,
    M: ModelDispatchPort,
    Msg: MessagingPort,
    S: StateStore,
    R: ResourceMonitorPort,
    P: ChatPollerPort,
    W: WatchdogPort,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        queue: FileQueue,
        workspaces: WorkspaceManager,
        runner: PipelineRunner<A, M, Msg, S>,
        crash: CrashRecovery<S, Msg>,
        throttler: ResourceThrottler<R, Msg>,
        intake: SubmissionIntake<P, Msg>,
        cleaner: RunCleaner,
        messaging: Msg,
        watchdog: W,
    ) -> Self {
        Self {
            queue,
            workspaces,
            runner,
            crash,
            throttler,
            intake,
            cleaner,
            messaging,
            heartbeat: WatchdogHeartbeat::new(watchdog.clone()),
            watchdog,
            idle_sleep: IDLE_SLEEP,
        }
    }

    pub fn with_idle_sleep(mut self, idle_sleep: Duration) -> Self {
        self.idle_sleep = idle_sleep;
        self
    }

    /// Resume interrupted runs, clean old ones, signal ready, start the
    /// heartbeat.
    pub async fn startup(&self) -> HeartbeatHandle {
        if let Err(err) = self.queue.ensure_dirs() {
            error!(error = %err, "failed to create queue directories");
        }

        self.resume_interrupted().await;

        match self.cleaner.clean().await {
            Ok(result) => info!(
                scanned = result.runs_scanned,
                cleaned = result.runs_cleaned,
                "retention pass complete"
            ),
            Err(err) => warn!(error = %err, "retention pass failed"),
        }

        self.watchdog.notify_ready();
        info!("pipeline service started, polling queue for work");
        self.heartbeat.start()
    }

    /// Run until the shutdown future resolves. Shutdown is honored only
    /// between runs; an in-flight pipeline run always finishes first.
    pub async fn run<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let heartbeat = self.startup().await;
        tokio::pin!(shutdown);

        loop {
            let worked = self.tick().await;
            if worked {
                // Re-check the shutdown signal between runs
                tokio::select! {
                    biased;
                    _ = &mut shutdown => break,
                    _ = std::future::ready(()) => {}
                }
            } else {
                tokio::select! {
                    _ = &mut shutdown => break,
                    _ = tokio::time::sleep(self.idle_sleep) => {}
                }
            }
        }

        heartbeat.stop();
        self.watchdog.notify_stopping();
        info!("pipeline service stopped");
    }

    /// One loop iteration: poll intake, then claim and process at most one
    /// queue item. Returns whether an item was processed.
    pub async fn tick(&self) -> bool {
        self.intake.poll_once().await;

        let claimed = match self.queue.claim_next() {
            Ok(claimed) => claimed,
            Err(err) => {
                warn!(error = %err, "queue claim failed");
                return false;
            }
        };
        let Some((item, processing_path)) = claimed else {
            return false;
        };

        info!(url = %item.url, "processing queue item");
        self.process_item(item, processing_path).await;
        true
    }

    async fn process_item(&self, item: QueueItem, processing_path: PathBuf) {
        if let Err(err) = self.throttler.wait_for_resources().await {
            warn!(error = %err, "resource monitor unavailable, proceeding unthrottled");
        }

        let workspace = match self.workspaces.acquire() {
            Ok(guard) => guard,
            Err(err) => {
                error!(error = %err, "workspace acquisition failed");
                self.fail_item(&processing_path, "workspace unavailable").await;
                return;
            }
        };

        match self.runner.run(&item, workspace.path()).await {
            Ok(state) if state.escalation_state != EscalationState::None => {
                // Paused, not failed: the queue file stays in processing/
                // so a later resume picks it up.
                warn!(
                    run_id = %state.run_id,
                    escalation = %state.escalation_state,
                    "run escalated, leaving queue item in processing"
                );
            }
            Ok(state) => {
                if let Err(err) = self.queue.complete(&processing_path) {
                    warn!(error = %err, "failed to complete queue item");
                }
                info!(run_id = %state.run_id, url = %item.url, "queue item completed");
            }
            Err(err) => {
                error!(url = %item.url, error = %err, "pipeline run failed");
                self.fail_item(&processing_path, &err.to_string()).await;
            }
        }
    }

    async fn fail_item(&self, processing_path: &Path, reason: &str) {
        if let Err(err) = self.queue.fail(processing_path) {
            warn!(error = %err, "failed to return queue item to inbox");
        }
        if let Err(err) = self
            .messaging
            .notify(&format!("Pipeline failed: {reason}"))
            .await
        {
            warn!(error = %err, "failed to send failure notification");
        }
    }

    /// Serially resume every interrupted run found by the crash scanner.
    async fn resume_interrupted(&self) {
        let plans = match self.crash.scan().await {
            Ok(plans) => plans,
            Err(err) => {
                warn!(error = %err, "crash recovery scan failed");
                return;
            }
        };

        for plan in plans {
            let workspace = PathBuf::from(&plan.run_state.workspace_path);
            if plan.run_state.workspace_path.is_empty() || !workspace.is_dir() {
                warn!(
                    run_id = %plan.run_state.run_id,
                    "workspace no longer exists, skipping resume"
                );
                continue;
            }

            let run_id = plan.run_state.run_id.clone();
            match self.runner.resume(plan.run_state, plan.resume_from).await {
                Ok(state) if state.escalation_state != EscalationState::None => {
                    warn!(run_id = %run_id, "resumed run escalated again");
                }
                Ok(_) => info!(run_id = %run_id, "resumed run completed"),
                Err(err) => error!(run_id = %run_id, error = %err, "failed to resume run"),
            }
        }
    }
}

#[cfg(test)]
#[path = "consumer_tests.rs"]
mod tests;
