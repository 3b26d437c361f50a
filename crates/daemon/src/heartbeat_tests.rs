// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use rw_adapters::FakeWatchdog;

#[test]
fn interval_is_half_the_declared_watchdog_usec() {
    let watchdog = FakeWatchdog::new();
    watchdog.set_watchdog_usec(Some(240_000_000));
    let heartbeat = WatchdogHeartbeat::new(watchdog);
    assert_eq!(heartbeat.interval(), Duration::from_secs(120));
}

#[test]
fn interval_falls_back_when_undeclared() {
    let heartbeat = WatchdogHeartbeat::new(FakeWatchdog::new());
    assert_eq!(heartbeat.interval(), Duration::from_secs(120));

    let heartbeat = heartbeat.with_fallback(Duration::from_secs(60));
    assert_eq!(heartbeat.interval(), Duration::from_secs(60));
}

#[tokio::test(start_paused = true)]
async fn pings_repeat_until_stopped() {
    let watchdog = FakeWatchdog::new();
    watchdog.set_watchdog_usec(Some(2_000_000)); // ping every second

    let handle = WatchdogHeartbeat::new(watchdog.clone()).start();
    tokio::task::yield_now().await;
    tokio::time::advance(Duration::from_millis(3500)).await;
    tokio::task::yield_now().await;

    let pinged = watchdog.ping_count();
    assert!(pinged >= 3, "expected several pings, got {pinged}");

    handle.stop();
    tokio::task::yield_now().await;
    let after_stop = watchdog.ping_count();
    tokio::time::advance(Duration::from_secs(10)).await;
    tokio::task::yield_now().await;
    assert_eq!(watchdog.ping_count(), after_stop);
}
