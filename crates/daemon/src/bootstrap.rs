// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Composition root wiring adapters into the consumer loop.
//!
//! The chat transport is deployment-specific and injected through
//! [`build_with`]; [`build`] wires the no-op messenger and poller, which is
//! the shape used when the daemon runs without chat credentials.

use crate::config::Settings;
use crate::consumer::ConsumerLoop;
use crate::intake::SubmissionIntake;
use rw_adapters::{
    ChatPollerPort, CliAgentBackend, MessagingPort, NoOpChatPoller, NoOpMessenger,
    ProcResourceMonitor, SystemdWatchdog,
};
use rw_core::{Clock, SystemClock};
use rw_engine::{
    ChatNotifier, CrashRecovery, EventBus, PipelineRunner, RecoveryChain, ReflectionLoop,
    ResourceThrottler, StageRunner,
};
use rw_storage::{EventJournalWriter, FileQueue, FileStateStore, RunCleaner, WorkspaceManager};
use std::sync::Arc;
use tracing::info;

/// Consumer loop with the stock adapter set and a pluggable chat side.
pub type DaemonConsumer<Msg, P> = ConsumerLoop<
    CliAgentBackend,
    CliAgentBackend,
    Msg,
    FileStateStore,
    ProcResourceMonitor,
    P,
    SystemdWatchdog,
>;

/// Wire the daemon without a chat transport.
pub fn build(settings: &Settings) -> DaemonConsumer<NoOpMessenger, NoOpChatPoller> {
    build_with(settings, NoOpMessenger, NoOpChatPoller)
}

/// Wire the daemon with a deployment-supplied messaging transport and
/// chat poller.
pub fn build_with<Msg, P>(settings: &Settings, messaging: Msg, poller: P) -> DaemonConsumer<Msg, P>
where
    Msg: MessagingPort,
    P: ChatPollerPort,
{
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let store = FileStateStore::new(settings.workspace_dir.join("runs"));
    let queue = FileQueue::new(&settings.queue_dir);
    let workspaces = WorkspaceManager::new(&settings.workspace_dir, clock.clone());
    let cleaner = RunCleaner::new(settings.workspace_dir.join("runs"));

    let backend = CliAgentBackend::new(
        &settings.agent_cli,
        &settings.workspace_dir,
        settings.agent_timeout,
    );

    let bus = EventBus::new();
    let journal = EventJournalWriter::new();
    bus.subscribe(Arc::new(journal.clone()));
    if settings.chat_enabled() {
        bus.subscribe(Arc::new(ChatNotifier::new(messaging.clone())));
    }

    let reflection = ReflectionLoop::with_min_pass_score(
        backend.clone(),
        backend.clone(),
        settings.min_qa_score,
    );
    let recovery = RecoveryChain::new(backend.clone(), messaging.clone());
    let stage_runner = StageRunner::new(reflection, recovery, bus.clone(), clock.clone());
    let runner = PipelineRunner::new(
        stage_runner,
        store.clone(),
        bus,
        journal,
        &settings.workflows_dir,
        clock.clone(),
    );

    let crash = CrashRecovery::new(store, messaging.clone());
    let throttler = ResourceThrottler::new(ProcResourceMonitor::new(), messaging.clone());
    let intake = SubmissionIntake::new(poller, queue.clone(), messaging.clone(), clock);

    info!(
        workspace = %settings.workspace_dir.display(),
        queue = %settings.queue_dir.display(),
        timeout_secs = settings.agent_timeout.as_secs(),
        chat = settings.chat_enabled(),
        "orchestrator wired"
    );

    ConsumerLoop::new(
        queue,
        workspaces,
        runner,
        crash,
        throttler,
        intake,
        cleaner,
        messaging,
        SystemdWatchdog,
    )
}

#[cfg(test)]
#[path = "bootstrap_tests.rs"]
mod tests;
