// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake resource monitor for deterministic testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{MonitorError, ResourceMonitorPort, ResourceSnapshot};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// An unconstrained snapshot: well under every default ceiling.
pub fn idle_snapshot() -> ResourceSnapshot {
    ResourceSnapshot {
        memory_used_bytes: 1024 * 1024 * 1024,
        memory_total_bytes: 8 * 1024 * 1024 * 1024,
        cpu_load_percent: 10.0,
        temperature_celsius: Some(45.0),
    }
}

/// Serves scripted snapshots in order; repeats the last one when the script
/// runs dry.
#[derive(Clone)]
pub struct FakeResourceMonitor {
    inner: Arc<Mutex<FakeMonitorState>>,
}

struct FakeMonitorState {
    script: VecDeque<ResourceSnapshot>,
    last: ResourceSnapshot,
    samples: usize,
}

impl Default for FakeResourceMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeResourceMonitor {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeMonitorState {
                script: VecDeque::new(),
                last: idle_snapshot(),
                samples: 0,
            })),
        }
    }

    /// Queue the next snapshot to serve.
    pub fn push_snapshot(&self, snapshot: ResourceSnapshot) {
        self.inner.lock().script.push_back(snapshot);
    }

    /// Number of snapshots taken so far.
    pub fn sample_count(&self) -> usize {
        self.inner.lock().samples
    }
}

#[async_trait]
impl ResourceMonitorPort for FakeResourceMonitor {
    async fn snapshot(&self) -> Result<ResourceSnapshot, MonitorError> {
        let mut inner = self.inner.lock();
        inner.samples += 1;
        if let Some(next) = inner.script.pop_front() {
            inner.last = next;
        }
        Ok(inner.last)
    }
}
