// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Polling for inbound user submissions.
//!
//! The transport (and its authorization of senders) lives with the
//! messaging implementation outside this workspace; the consumer loop only
//! sees already-authorized text submissions with monotonic update ids.

mod noop;

pub use noop::NoOpChatPoller;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeChatPoller;

use crate::messaging::MessagingError;
use async_trait::async_trait;

/// One inbound message from the chat channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundSubmission {
    /// Monotonic per-channel identifier, used for de-duplication
    pub update_id: i64,
    pub text: String,
}

/// Fetch new submissions without blocking.
#[async_trait]
pub trait ChatPollerPort: Clone + Send + Sync + 'static {
    async fn poll_once(&self) -> Result<Vec<InboundSubmission>, MessagingError>;
}
