// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Intake of chat submissions into the queue.
//!
//! Polls the chat adapter, de-duplicates by update id (bounded window),
//! validates that the text is a single-video YouTube URL, and enqueues.
//! Acknowledgements are best-effort.

use parking_lot::Mutex;
use rw_adapters::{watch_url, ChatPollerPort, MessagingPort};
use rw_core::{Clock, QueueItem};
use rw_storage::FileQueue;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tracing::{info, warn};

/// Update ids remembered for de-duplication.
const MAX_SEEN_IDS: usize = 10_000;

/// Insertion-ordered bounded id window.
#[derive(Default)]
struct SeenIds {
    order: VecDeque<i64>,
    ids: HashSet<i64>,
}

impl SeenIds {
    /// Record an id; returns false when it was already present.
    fn insert(&mut self, id: i64) -> bool {
        if !self.ids.insert(id) {
            return false;
        }
        self.order.push_back(id);
        while self.order.len() > MAX_SEEN_IDS {
            if let Some(evicted) = self.order.pop_front() {
                self.ids.remove(&evicted);
            }
        }
        true
    }
}

/// Validates and enqueues inbound chat submissions.
#[derive(Clone)]
pub struct SubmissionIntake<P, Msg> {
    poller: P,
    queue: FileQueue,
    messaging: Msg,
    clock: Arc<dyn Clock>,
    seen: Arc<Mutex<SeenIds>>,
}

impl<P, Msg> SubmissionIntake<P, Msg>
where
    P: ChatPollerPort,
    Msg: MessagingPort,
{
    pub fn new(poller: P, queue: FileQueue, messaging: Msg, clock: Arc<dyn Clock>) -> Self {
        Self {
            poller,
            queue,
            messaging,
            clock,
            seen: Arc::new(Mutex::new(SeenIds::default())),
        }
    }

    /// Fetch new submissions once and enqueue the valid ones.
    ///
    /// Returns the number of items enqueued.
    pub async fn poll_once(&self) -> usize {
        let submissions = match self.poller.poll_once().await {
            Ok(submissions) => submissions,
            Err(err) => {
                warn!(error = %err, "failed to fetch chat submissions");
                return 0;
            }
        };

        let mut enqueued = 0;
        for submission in submissions {
            if !self.seen.lock().insert(submission.update_id) {
                continue;
            }

            let text = submission.text.trim();
            if !watch_url::is_watch_url(text) {
                self.reply("Please send a YouTube URL").await;
                continue;
            }

            let item = match QueueItem::new(text, submission.update_id, self.clock.now_utc()) {
                Ok(item) => item,
                Err(err) => {
                    warn!(error = %err, "rejected submission");
                    continue;
                }
            };
            if let Err(err) = self.queue.enqueue(&item) {
                warn!(error = %err, url = text, "failed to enqueue submission");
                continue;
            }
            enqueued += 1;
            info!(url = text, update_id = submission.update_id, "enqueued submission");

            let pending = self.queue.pending_count();
            if pending > 1 {
                self.reply(&format!("Queued! You're #{pending} in line.")).await;
            } else {
                self.reply("Queued! Processing will begin shortly.").await;
            }
        }
        enqueued
    }

    async fn reply(&self, text: &str) {
        if let Err(err) = self.messaging.notify(text).await {
            warn!(error = %err, "failed to send intake reply");
        }
    }
}

#[cfg(test)]
#[path = "intake_tests.rs"]
mod tests;
