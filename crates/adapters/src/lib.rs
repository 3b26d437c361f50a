// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rw-adapters: Port traits and concrete adapters.
//!
//! The engine only sees the narrow trait on each module's boundary; the
//! concrete adapters here talk to the AI CLI subprocess, procfs, the systemd
//! notify socket, and the knowledge-base file. Fake adapters for tests live
//! behind the `test-support` feature.

pub mod agent;
pub mod chat;
pub mod knowledge;
pub mod messaging;
pub mod model;
pub mod monitor;
pub mod subprocess;
pub mod watch_url;
pub mod watchdog;

pub use agent::{AgentError, AgentExecutionPort, CliAgentBackend};
pub use chat::{ChatPollerPort, InboundSubmission, NoOpChatPoller};
pub use knowledge::{KnowledgeError, YamlKnowledgeBase};
pub use messaging::{MessagingError, MessagingPort, NoOpMessenger};
pub use model::{DispatchError, ModelDispatchPort};
pub use monitor::{MonitorError, ProcResourceMonitor, ResourceMonitorPort, ResourceSnapshot};
pub use subprocess::{run_with_timeout, SubprocessError};
pub use watchdog::{SystemdWatchdog, WatchdogPort};

#[cfg(any(test, feature = "test-support"))]
pub use agent::FakeAgentBackend;
#[cfg(any(test, feature = "test-support"))]
pub use chat::FakeChatPoller;
#[cfg(any(test, feature = "test-support"))]
pub use messaging::FakeMessenger;
#[cfg(any(test, feature = "test-support"))]
pub use model::FakeModelDispatch;
#[cfg(any(test, feature = "test-support"))]
pub use monitor::{idle_snapshot, FakeResourceMonitor};
#[cfg(any(test, feature = "test-support"))]
pub use watchdog::FakeWatchdog;
