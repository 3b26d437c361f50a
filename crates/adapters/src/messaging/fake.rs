// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake messenger for deterministic testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{MessagingError, MessagingPort};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One file sent through the fake messenger.
#[derive(Debug, Clone)]
pub struct SentFile {
    pub path: PathBuf,
    pub caption: String,
}

/// Records every outgoing message and serves scripted replies to `ask`.
#[derive(Clone, Default)]
pub struct FakeMessenger {
    inner: Arc<Mutex<FakeMessengerState>>,
}

#[derive(Default)]
struct FakeMessengerState {
    notifications: Vec<String>,
    questions: Vec<String>,
    files: Vec<SentFile>,
    replies: VecDeque<String>,
    fail_sends: bool,
}

impl FakeMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the reply for the next `ask`.
    pub fn push_reply(&self, reply: impl Into<String>) {
        self.inner.lock().replies.push_back(reply.into());
    }

    /// Make every subsequent send fail.
    pub fn set_fail_sends(&self, fail: bool) {
        self.inner.lock().fail_sends = fail;
    }

    pub fn notifications(&self) -> Vec<String> {
        self.inner.lock().notifications.clone()
    }

    pub fn questions(&self) -> Vec<String> {
        self.inner.lock().questions.clone()
    }

    pub fn files(&self) -> Vec<SentFile> {
        self.inner.lock().files.clone()
    }
}

#[async_trait]
impl MessagingPort for FakeMessenger {
    async fn notify(&self, text: &str) -> Result<(), MessagingError> {
        let mut inner = self.inner.lock();
        if inner.fail_sends {
            return Err(MessagingError::SendFailed("scripted failure".to_string()));
        }
        inner.notifications.push(text.to_string());
        Ok(())
    }

    async fn ask(&self, text: &str) -> Result<String, MessagingError> {
        let mut inner = self.inner.lock();
        if inner.fail_sends {
            return Err(MessagingError::SendFailed("scripted failure".to_string()));
        }
        inner.questions.push(text.to_string());
        inner.replies.pop_front().ok_or(MessagingError::Unavailable)
    }

    async fn send_file(&self, path: &Path, caption: &str) -> Result<(), MessagingError> {
        let mut inner = self.inner.lock();
        if inner.fail_sends {
            return Err(MessagingError::SendFailed("scripted failure".to_string()));
        }
        inner.files.push(SentFile {
            path: path.to_path_buf(),
            caption: caption.to_string(),
        });
        Ok(())
    }
}
