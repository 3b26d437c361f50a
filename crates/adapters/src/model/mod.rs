// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Routes prompts to an AI model by role

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{DispatchCall, FakeModelDispatch};

use async_trait::async_trait;
use thiserror::Error;

/// Errors from a model dispatch.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("dispatch backend error: {0}")]
    Backend(String),
}

/// Route a prompt to a model and return the raw response body.
///
/// The reflection loop calls this with role `qa_evaluator`; other roles are
/// reserved for analysis dispatches inside stage adapters.
#[async_trait]
pub trait ModelDispatchPort: Clone + Send + Sync + 'static {
    async fn dispatch(
        &self,
        role: &str,
        prompt: &str,
        model: Option<&str>,
    ) -> Result<String, DispatchError>;
}
