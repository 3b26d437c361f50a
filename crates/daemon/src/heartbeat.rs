// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic keep-alive pings to the supervising init

use rw_adapters::WatchdogPort;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::info;

/// Used when the supervising init declares no watchdog interval.
const FALLBACK_INTERVAL: Duration = Duration::from_secs(120);

/// Sends `WATCHDOG=1` at half the declared watchdog interval.
#[derive(Clone)]
pub struct WatchdogHeartbeat<W> {
    watchdog: W,
    fallback: Duration,
}

impl<W> WatchdogHeartbeat<W>
where
    W: WatchdogPort,
{
    pub fn new(watchdog: W) -> Self {
        Self {
            watchdog,
            fallback: FALLBACK_INTERVAL,
        }
    }

    pub fn with_fallback(mut self, fallback: Duration) -> Self {
        self.fallback = fallback;
        self
    }

    /// Half the declared `WATCHDOG_USEC`, or the fallback when undeclared.
    pub fn interval(&self) -> Duration {
        match self.watchdog.watchdog_usec() {
            Some(usec) => Duration::from_micros(usec / 2),
            None => self.fallback,
        }
    }

    /// Spawn the periodic ping task.
    pub fn start(&self) -> HeartbeatHandle {
        let interval = self.interval();
        info!(interval_secs = interval.as_secs_f64(), "watchdog heartbeat started");

        let watchdog = self.watchdog.clone();
        let task = tokio::spawn(async move {
            loop {
                watchdog.notify_watchdog();
                tokio::time::sleep(interval).await;
            }
        });
        HeartbeatHandle { task }
    }
}

/// Handle to the running heartbeat task.
pub struct HeartbeatHandle {
    task: JoinHandle<()>,
}

impl HeartbeatHandle {
    /// Stop sending pings.
    pub fn stop(self) {
        self.task.abort();
    }
}

#[cfg(test)]
#[path = "heartbeat_tests.rs"]
mod tests;
