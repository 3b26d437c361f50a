// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chat poller for deployments without a chat transport

use super::{ChatPollerPort, InboundSubmission};
use crate::messaging::MessagingError;
use async_trait::async_trait;

/// Never yields submissions; queue intake happens by other means (direct
/// enqueue into the queue directory).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpChatPoller;

#[async_trait]
impl ChatPollerPort for NoOpChatPoller {
    async fn poll_once(&self) -> Result<Vec<InboundSubmission>, MessagingError> {
        Ok(Vec::new())
    }
}
