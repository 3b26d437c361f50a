// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-local fan-out of pipeline events.
//!
//! Dispatch is sequential in subscription order; a failing listener is
//! logged and swallowed so it can neither starve the other listeners nor
//! propagate into the publisher.

use parking_lot::Mutex;
use rw_core::{EventListener, PipelineEvent};
use std::sync::Arc;
use tracing::warn;

/// Publish/subscribe fan-out for observability events.
#[derive(Clone, Default)]
pub struct EventBus {
    listeners: Arc<Mutex<Vec<Arc<dyn EventListener>>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for every subsequently published event.
    pub fn subscribe(&self, listener: Arc<dyn EventListener>) {
        self.listeners.lock().push(listener);
    }

    /// Dispatch an event to all listeners in subscription order.
    pub async fn publish(&self, event: &PipelineEvent) {
        let listeners: Vec<Arc<dyn EventListener>> = self.listeners.lock().clone();
        for listener in listeners {
            if let Err(err) = listener.handle(event).await {
                warn!(event = %event.name, error = %err, "event listener failed");
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
