// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rw-engine: Orchestration of pipeline runs.
//!
//! The layers compose bottom-up: the event bus fans out observability
//! events; the reflection loop drives one agent through its QA gate; the
//! recovery chain rescues raised stages; the stage runner glues those
//! together; the pipeline runner walks a run across the stage sequence,
//! checkpointing between stages; the crash scanner turns persisted state
//! into resume plans at startup.

pub mod bus;
pub mod crash;
pub mod error;
pub mod layout;
pub mod notify;
pub mod recovery;
pub mod reflection;
pub mod registry;
pub mod runner;
pub mod stage_runner;
pub mod throttle;

pub use bus::EventBus;
pub use crash::{CrashRecovery, RecoveryPlan};
pub use error::PipelineError;
pub use layout::{LayoutEscalationHandler, LayoutError};
pub use notify::ChatNotifier;
pub use recovery::{RecoveryChain, RecoveryLevel, RecoveryOutcome};
pub use reflection::{QaError, ReflectionLoop, MIN_PASS_SCORE, QA_ROLE};
pub use registry::{stage_spec, StageSpec, STAGE_SPECS};
pub use runner::PipelineRunner;
pub use stage_runner::StageRunner;
pub use throttle::{ResourceThrottler, ThrottleConfig};
