// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake model dispatch for deterministic testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{DispatchError, ModelDispatchPort};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// One recorded dispatch call.
#[derive(Debug, Clone)]
pub struct DispatchCall {
    pub role: String,
    pub prompt: String,
    pub model: Option<String>,
}

/// Scripted model dispatch: returns queued responses in order.
///
/// When the script runs dry, dispatches fail with a backend error.
#[derive(Clone, Default)]
pub struct FakeModelDispatch {
    inner: Arc<Mutex<FakeDispatchState>>,
}

#[derive(Default)]
struct FakeDispatchState {
    script: VecDeque<Result<String, DispatchError>>,
    calls: Vec<DispatchCall>,
}

impl FakeModelDispatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the response body for the next dispatch.
    pub fn push_response(&self, body: impl Into<String>) {
        self.inner.lock().script.push_back(Ok(body.into()));
    }

    /// Queue a backend failure for the next dispatch.
    pub fn push_error(&self, message: impl Into<String>) {
        self.inner
            .lock()
            .script
            .push_back(Err(DispatchError::Backend(message.into())));
    }

    pub fn calls(&self) -> Vec<DispatchCall> {
        self.inner.lock().calls.clone()
    }
}

#[async_trait]
impl ModelDispatchPort for FakeModelDispatch {
    async fn dispatch(
        &self,
        role: &str,
        prompt: &str,
        model: Option<&str>,
    ) -> Result<String, DispatchError> {
        let mut inner = self.inner.lock();
        inner.calls.push(DispatchCall {
            role: role.to_string(),
            prompt: prompt.to_string(),
            model: model.map(str::to_string),
        });
        inner
            .script
            .pop_front()
            .unwrap_or_else(|| Err(DispatchError::Backend("no scripted response".to_string())))
    }
}
