// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Point-in-time system load snapshots

mod proc;

pub use proc::ProcResourceMonitor;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{idle_snapshot, FakeResourceMonitor};

use async_trait::async_trait;
use thiserror::Error;

/// Errors from resource sampling.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unparseable {source_name}: {reason}")]
    Unparseable { source_name: String, reason: String },
}

/// Point-in-time view of system resources.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceSnapshot {
    pub memory_used_bytes: u64,
    pub memory_total_bytes: u64,
    /// 1-minute load average normalized to core count, 0-100
    pub cpu_load_percent: f64,
    /// Unavailable on hosts without a thermal zone
    pub temperature_celsius: Option<f64>,
}

/// Sample system resources.
#[async_trait]
pub trait ResourceMonitorPort: Clone + Send + Sync + 'static {
    async fn snapshot(&self) -> Result<ResourceSnapshot, MonitorError>;
}
