// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! systemd watchdog integration over the sd_notify datagram protocol.
//!
//! Messages go to the unix datagram socket named by `NOTIFY_SOCKET`;
//! abstract-namespace addresses (`@...`) are supported. All sends are
//! best-effort: a missing socket means the process is not supervised.

use std::os::unix::net::UnixDatagram;
use tracing::{debug, warn};

/// Supervising-init notification channel.
pub trait WatchdogPort: Clone + Send + Sync + 'static {
    /// Signal that the service finished starting (`READY=1`).
    fn notify_ready(&self) -> bool;

    /// Send one keep-alive ping (`WATCHDOG=1`).
    fn notify_watchdog(&self) -> bool;

    /// Signal that shutdown began (`STOPPING=1`).
    fn notify_stopping(&self) -> bool;

    /// Declared watchdog interval in microseconds, if supervised with one.
    fn watchdog_usec(&self) -> Option<u64>;
}

/// sd_notify-speaking watchdog port.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemdWatchdog;

impl WatchdogPort for SystemdWatchdog {
    fn notify_ready(&self) -> bool {
        sd_notify("READY=1")
    }

    fn notify_watchdog(&self) -> bool {
        sd_notify("WATCHDOG=1")
    }

    fn notify_stopping(&self) -> bool {
        sd_notify("STOPPING=1")
    }

    fn watchdog_usec(&self) -> Option<u64> {
        let raw = std::env::var("WATCHDOG_USEC").ok()?;
        match raw.parse::<u64>() {
            Ok(usec) => Some(usec),
            Err(_) => {
                warn!(raw, "invalid WATCHDOG_USEC value");
                None
            }
        }
    }
}

/// Send one state string to the `NOTIFY_SOCKET` address.
///
/// Returns false when unsupervised or on send failure.
fn sd_notify(state: &str) -> bool {
    let Ok(addr) = std::env::var("NOTIFY_SOCKET") else {
        return false;
    };
    if addr.is_empty() {
        return false;
    }

    // Abstract-namespace sockets are addressed with a leading NUL
    let addr = if let Some(rest) = addr.strip_prefix('@') {
        format!("\0{rest}")
    } else {
        addr
    };

    let sent = UnixDatagram::unbound()
        .and_then(|sock| sock.send_to_addr(state.as_bytes(), &unix_addr(&addr)?));
    match sent {
        Ok(_) => {
            debug!(state, "sd_notify sent");
            true
        }
        Err(err) => {
            warn!(state, error = %err, "sd_notify failed");
            false
        }
    }
}

fn unix_addr(addr: &str) -> std::io::Result<std::os::unix::net::SocketAddr> {
    use std::os::linux::net::SocketAddrExt;
    if let Some(name) = addr.strip_prefix('\0') {
        std::os::unix::net::SocketAddr::from_abstract_name(name.as_bytes())
    } else {
        std::os::unix::net::SocketAddr::from_pathname(addr)
    }
}

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake {
    #![cfg_attr(coverage_nightly, coverage(off))]

    use super::WatchdogPort;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Records notifications and serves a configurable interval.
    #[derive(Clone, Default)]
    pub struct FakeWatchdog {
        inner: Arc<Mutex<FakeWatchdogState>>,
    }

    #[derive(Default)]
    struct FakeWatchdogState {
        ready: usize,
        pings: usize,
        stopping: usize,
        usec: Option<u64>,
    }

    impl FakeWatchdog {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_watchdog_usec(&self, usec: Option<u64>) {
            self.inner.lock().usec = usec;
        }

        pub fn ready_count(&self) -> usize {
            self.inner.lock().ready
        }

        pub fn ping_count(&self) -> usize {
            self.inner.lock().pings
        }

        pub fn stopping_count(&self) -> usize {
            self.inner.lock().stopping
        }
    }

    impl WatchdogPort for FakeWatchdog {
        fn notify_ready(&self) -> bool {
            self.inner.lock().ready += 1;
            true
        }

        fn notify_watchdog(&self) -> bool {
            self.inner.lock().pings += 1;
            true
        }

        fn notify_stopping(&self) -> bool {
            self.inner.lock().stopping += 1;
            true
        }

        fn watchdog_usec(&self) -> Option<u64> {
            self.inner.lock().usec
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeWatchdog;

#[cfg(test)]
#[path = "watchdog_tests.rs"]
mod tests;
