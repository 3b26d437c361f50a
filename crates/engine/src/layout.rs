// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Learning unknown camera layouts from the user.
//!
//! Sends the offending frame to the user, offers standard framing options
//! or a custom crop, stores the answer in the knowledge base, and returns
//! the resolved crop region. With no interactive channel available the
//! layout stays unknown and the error bubbles as a pipeline failure.

use rw_adapters::{KnowledgeError, MessagingError, MessagingPort, YamlKnowledgeBase};
use rw_core::CropRegion;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Standard options offered for an unknown layout (1920x1080 source).
const ESCALATION_OPTIONS: [&str; 4] = [
    "(A) Focus speaker left",
    "(B) Focus speaker right",
    "(C) Focus center",
    "(D) Custom crop (provide: x,y,width,height)",
];

const OPTION_CROPS: [(&str, (u32, u32, u32, u32)); 3] = [
    ("A", (0, 0, 540, 1080)),
    ("B", (1380, 0, 540, 1080)),
    ("C", (690, 0, 540, 1080)),
];

/// Errors from the layout escalation flow.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("could not parse layout guidance: {reply:?}. Expected A/B/C or x,y,width,height")]
    UnparseableGuidance { reply: String },
    #[error("no interactive fallback available: {0}")]
    Messaging(#[from] MessagingError),
    #[error("knowledge base failure: {0}")]
    Knowledge(#[from] KnowledgeError),
}

/// Escalates unknown layouts to the user and learns from the reply.
#[derive(Clone)]
pub struct LayoutEscalationHandler<Msg> {
    messaging: Msg,
    knowledge: YamlKnowledgeBase,
}

impl<Msg> LayoutEscalationHandler<Msg>
where
    Msg: MessagingPort,
{
    pub fn new(messaging: Msg, knowledge: YamlKnowledgeBase) -> Self {
        Self {
            messaging,
            knowledge,
        }
    }

    /// Send the frame, ask for guidance, persist and return the strategy.
    pub async fn escalate(
        &self,
        frame_path: &Path,
        layout_name: &str,
        at_seconds: f64,
    ) -> Result<CropRegion, LayoutError> {
        self.messaging
            .send_file(
                frame_path,
                &format!("Unknown layout '{layout_name}' at {at_seconds:.1}s. How should I frame this?"),
            )
            .await?;

        let reply = self
            .messaging
            .ask(&format!(
                "Choose framing for this layout:\n{}",
                ESCALATION_OPTIONS.join("\n")
            ))
            .await?;

        let crop = parse_guidance(&reply, layout_name)?;
        self.knowledge.save_strategy(layout_name, &crop).await?;
        self.messaging
            .notify(&format!(
                "Learned layout '{layout_name}' — will auto-apply next time."
            ))
            .await?;

        info!(layout = layout_name, "layout escalation resolved");
        Ok(crop)
    }
}

/// Parse an A/B/C choice or a custom `x,y,width,height` crop.
fn parse_guidance(reply: &str, layout_name: &str) -> Result<CropRegion, LayoutError> {
    let cleaned = reply.trim().to_ascii_uppercase();

    for (key, (x, y, w, h)) in OPTION_CROPS {
        if cleaned == key || cleaned == format!("({key})") {
            return CropRegion::new(x, y, w, h, layout_name).map_err(|_| {
                LayoutError::UnparseableGuidance {
                    reply: reply.to_string(),
                }
            });
        }
    }

    let parts: Vec<u32> = reply
        .split(',')
        .map(|p| p.trim().parse::<u32>())
        .collect::<Result<_, _>>()
        .unwrap_or_default();
    if parts.len() == 4 {
        if let Ok(crop) = CropRegion::new(parts[0], parts[1], parts[2], parts[3], layout_name) {
            return Ok(crop);
        }
    }

    Err(LayoutError::UnparseableGuidance {
        reply: reply.to_string(),
    })
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;
