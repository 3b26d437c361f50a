// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User contact over the chat channel.
//!
//! The wire protocol lives outside this workspace; deployments wire a
//! transport implementing [`MessagingPort`] into the bootstrap. The core
//! proceeds without one: [`NoOpMessenger`] logs notifications and refuses
//! interactive questions, which makes callers fall back to their
//! non-interactive defaults.

mod noop;

pub use noop::NoOpMessenger;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeMessenger, SentFile};

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Errors from messaging operations.
#[derive(Debug, Error)]
pub enum MessagingError {
    #[error("send failed: {0}")]
    SendFailed(String),
    #[error("no interactive channel available")]
    Unavailable,
}

/// Communicate with the user on the chat channel.
#[async_trait]
pub trait MessagingPort: Clone + Send + Sync + 'static {
    /// Fire-and-forget status message.
    async fn notify(&self, text: &str) -> Result<(), MessagingError>;

    /// Ask a question and block for the reply.
    async fn ask(&self, text: &str) -> Result<String, MessagingError>;

    /// Send a file with a caption.
    async fn send_file(&self, path: &Path, caption: &str) -> Result<(), MessagingError>;
}
