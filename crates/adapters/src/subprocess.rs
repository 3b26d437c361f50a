// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess execution helpers

use std::process::Output;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

/// Errors from a timed subprocess run.
#[derive(Debug, Error)]
pub enum SubprocessError {
    #[error("{what} timed out after {secs}s")]
    TimedOut { what: String, secs: u64 },
    #[error("{what} failed: {source}")]
    Io {
        what: String,
        #[source]
        source: std::io::Error,
    },
}

/// Run a command to completion with a deadline.
///
/// The child is killed when the deadline elapses (the command must be built
/// with `kill_on_drop(true)` by the caller for the kill to be immediate).
pub async fn run_with_timeout(
    mut cmd: Command,
    timeout: Duration,
    what: &str,
) -> Result<Output, SubprocessError> {
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(source)) => Err(SubprocessError::Io {
            what: what.to_string(),
            source,
        }),
        Err(_elapsed) => Err(SubprocessError::TimedOut {
            what: what.to_string(),
            secs: timeout.as_secs(),
        }),
    }
}

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;
