// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake chat poller for deterministic testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ChatPollerPort, InboundSubmission};
use crate::messaging::MessagingError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Serves scripted submission batches, one batch per poll.
#[derive(Clone, Default)]
pub struct FakeChatPoller {
    batches: Arc<Mutex<VecDeque<Vec<InboundSubmission>>>>,
}

impl FakeChatPoller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a batch for the next poll.
    pub fn push_batch(&self, batch: Vec<InboundSubmission>) {
        self.batches.lock().push_back(batch);
    }

    /// Queue a single-submission batch.
    pub fn push_submission(&self, update_id: i64, text: impl Into<String>) {
        self.push_batch(vec![InboundSubmission {
            update_id,
            text: text.into(),
        }]);
    }
}

#[async_trait]
impl ChatPollerPort for FakeChatPoller {
    async fn poll_once(&self) -> Result<Vec<InboundSubmission>, MessagingError> {
        Ok(self.batches.lock().pop_front().unwrap_or_default())
    }
}
