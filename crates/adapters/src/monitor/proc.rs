// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Linux procfs/sysfs resource monitor.
//!
//! Designed for a small single-board host but works on any Linux with
//! `/proc/meminfo` and `/proc/loadavg`. Temperature comes from
//! `thermal_zone0` and is optional.

use super::{MonitorError, ResourceMonitorPort, ResourceSnapshot};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

const MEMINFO: &str = "/proc/meminfo";
const LOADAVG: &str = "/proc/loadavg";
const THERMAL: &str = "/sys/class/thermal/thermal_zone0/temp";

/// Reads CPU, memory, and temperature from the Linux proc and sys trees.
#[derive(Debug, Clone)]
pub struct ProcResourceMonitor {
    meminfo: PathBuf,
    loadavg: PathBuf,
    thermal: PathBuf,
}

impl Default for ProcResourceMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcResourceMonitor {
    pub fn new() -> Self {
        Self {
            meminfo: PathBuf::from(MEMINFO),
            loadavg: PathBuf::from(LOADAVG),
            thermal: PathBuf::from(THERMAL),
        }
    }

    /// Point the monitor at alternate files (for tests).
    pub fn with_sources(
        meminfo: impl Into<PathBuf>,
        loadavg: impl Into<PathBuf>,
        thermal: impl Into<PathBuf>,
    ) -> Self {
        Self {
            meminfo: meminfo.into(),
            loadavg: loadavg.into(),
            thermal: thermal.into(),
        }
    }
}

#[async_trait]
impl ResourceMonitorPort for ProcResourceMonitor {
    async fn snapshot(&self) -> Result<ResourceSnapshot, MonitorError> {
        let meminfo = tokio::fs::read_to_string(&self.meminfo).await?;
        let (memory_used_bytes, memory_total_bytes) = parse_meminfo(&meminfo, &self.meminfo)?;

        let loadavg = tokio::fs::read_to_string(&self.loadavg).await?;
        let cpu_load_percent = parse_loadavg(&loadavg, &self.loadavg, online_cpus())?;

        let temperature_celsius = match tokio::fs::read_to_string(&self.thermal).await {
            Ok(raw) => raw.trim().parse::<i64>().ok().map(|milli| milli as f64 / 1000.0),
            Err(_) => None,
        };

        Ok(ResourceSnapshot {
            memory_used_bytes,
            memory_total_bytes,
            cpu_load_percent,
            temperature_celsius,
        })
    }
}

fn online_cpus() -> u64 {
    std::thread::available_parallelism()
        .map(|n| n.get() as u64)
        .unwrap_or(1)
}

/// Parse MemTotal and MemAvailable (kB) into (used, total) bytes.
fn parse_meminfo(content: &str, source: &Path) -> Result<(u64, u64), MonitorError> {
    let mut total = 0u64;
    let mut available = 0u64;
    for line in content.lines() {
        if let Some(rest) = line.strip_prefix("MemTotal:") {
            total = parse_kb(rest).unwrap_or(0);
        } else if let Some(rest) = line.strip_prefix("MemAvailable:") {
            available = parse_kb(rest).unwrap_or(0);
        }
        if total > 0 && available > 0 {
            break;
        }
    }
    if total == 0 || available == 0 {
        return Err(MonitorError::Unparseable {
            source_name: source.display().to_string(),
            reason: "missing MemTotal or MemAvailable".to_string(),
        });
    }
    Ok((total - available, total))
}

fn parse_kb(rest: &str) -> Option<u64> {
    rest.split_whitespace()
        .next()
        .and_then(|v| v.parse::<u64>().ok())
        .map(|kb| kb * 1024)
}

/// Parse the 1-minute load average as a percentage of online cores,
/// capped at 100.
fn parse_loadavg(content: &str, source: &Path, cpus: u64) -> Result<f64, MonitorError> {
    let load_1m: f64 = content
        .split_whitespace()
        .next()
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| MonitorError::Unparseable {
            source_name: source.display().to_string(),
            reason: "missing 1-minute load".to_string(),
        })?;
    Ok((load_1m / cpus.max(1) as f64 * 100.0).min(100.0))
}

#[cfg(test)]
#[path = "proc_tests.rs"]
mod tests;
