// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One pipeline request waiting in the FIFO queue

use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A pipeline request as carried in queue files.
///
/// The JSON field names are the wire format of the queue directory and must
/// stay stable across versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueItem {
    pub url: String,
    /// Monotonic external identifier, used for de-duplication
    #[serde(rename = "telegram_update_id")]
    pub update_id: i64,
    pub queued_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_focus: Option<String>,
}

impl QueueItem {
    pub fn new(url: impl Into<String>, update_id: i64, queued_at: DateTime<Utc>) -> Result<Self, ValidationError> {
        let url = url.into();
        if url.is_empty() {
            return Err(ValidationError::new("url must not be empty"));
        }
        Ok(Self {
            url,
            update_id,
            queued_at,
            topic_focus: None,
        })
    }

    pub fn with_topic_focus(mut self, topic: impl Into<String>) -> Self {
        self.topic_focus = Some(topic.into());
        self
    }
}

#[cfg(test)]
#[path = "queue_item_tests.rs"]
mod tests;
