// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Defers heavy work while the host is under stress.
//!
//! One advisory notification goes out when processing pauses; resumption is
//! silent.

use rw_adapters::{MessagingPort, MonitorError, ResourceMonitorPort, ResourceSnapshot};
use std::time::Duration;
use tracing::{error, info, warn};

const GIB: u64 = 1024 * 1024 * 1024;

/// Ceilings for resource-based throttling.
#[derive(Debug, Clone, Copy)]
pub struct ThrottleConfig {
    pub memory_limit_bytes: u64,
    pub cpu_limit_percent: f64,
    pub temperature_limit_celsius: f64,
    pub check_interval: Duration,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            memory_limit_bytes: 3 * GIB,
            cpu_limit_percent: 80.0,
            temperature_limit_celsius: 80.0,
            check_interval: Duration::from_secs(30),
        }
    }
}

/// Blocks until system resources fall under the configured ceilings.
#[derive(Clone)]
pub struct ResourceThrottler<R, Msg> {
    monitor: R,
    messaging: Msg,
    config: ThrottleConfig,
}

impl<R, Msg> ResourceThrottler<R, Msg>
where
    R: ResourceMonitorPort,
    Msg: MessagingPort,
{
    pub fn new(monitor: R, messaging: Msg) -> Self {
        Self::with_config(monitor, messaging, ThrottleConfig::default())
    }

    pub fn with_config(monitor: R, messaging: Msg, config: ThrottleConfig) -> Self {
        Self {
            monitor,
            messaging,
            config,
        }
    }

    /// Return once every constraint holds, polling at the configured
    /// interval while the host is constrained.
    pub async fn wait_for_resources(&self) -> Result<(), MonitorError> {
        let snapshot = self.monitor.snapshot().await?;
        let Some(mut reason) = self.constrained_reason(&snapshot) else {
            return Ok(());
        };

        warn!(reason, "resource constraint detected");
        self.notify_paused(&reason).await;

        loop {
            tokio::time::sleep(self.config.check_interval).await;
            let snapshot = self.monitor.snapshot().await?;
            match self.constrained_reason(&snapshot) {
                Some(next) => reason = next,
                None => break,
            }
        }

        info!("resources available, resuming processing");
        Ok(())
    }

    /// Human-readable reason when a ceiling is exceeded, else `None`.
    fn constrained_reason(&self, snapshot: &ResourceSnapshot) -> Option<String> {
        if snapshot.memory_used_bytes > self.config.memory_limit_bytes {
            let used = snapshot.memory_used_bytes as f64 / GIB as f64;
            let limit = self.config.memory_limit_bytes as f64 / GIB as f64;
            return Some(format!("Memory usage {used:.1}GB exceeds {limit:.1}GB limit"));
        }
        if snapshot.cpu_load_percent > self.config.cpu_limit_percent {
            return Some(format!(
                "CPU load {:.0}% exceeds {:.0}% limit",
                snapshot.cpu_load_percent, self.config.cpu_limit_percent
            ));
        }
        if let Some(temperature) = snapshot.temperature_celsius {
            if temperature > self.config.temperature_limit_celsius {
                return Some(format!(
                    "Temperature {temperature:.1}C exceeds {:.1}C limit",
                    self.config.temperature_limit_celsius
                ));
            }
        }
        None
    }

    async fn notify_paused(&self, reason: &str) {
        let message = format!("Pipeline paused — {reason}. Resuming automatically...");
        if let Err(err) = self.messaging.notify(&message).await {
            error!(error = %err, "failed to send throttle notification");
        }
    }
}

#[cfg(test)]
#[path = "throttle_tests.rs"]
mod tests;
