// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Messaging adapter for deployments without a chat transport

use super::{MessagingError, MessagingPort};
use async_trait::async_trait;
use std::path::Path;
use tracing::info;

/// Logs notifications and declines interactive questions.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMessenger;

#[async_trait]
impl MessagingPort for NoOpMessenger {
    async fn notify(&self, text: &str) -> Result<(), MessagingError> {
        info!(text, "notification (chat disabled)");
        Ok(())
    }

    async fn ask(&self, _text: &str) -> Result<String, MessagingError> {
        Err(MessagingError::Unavailable)
    }

    async fn send_file(&self, path: &Path, caption: &str) -> Result<(), MessagingError> {
        info!(file = %path.display(), caption, "file delivery (chat disabled)");
        Ok(())
    }
}

#[cfg(test)]
#[path = "noop_tests.rs"]
mod tests;
