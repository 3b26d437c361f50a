// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline stage enumeration and canonical ordering

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One atomic unit of work in the pipeline.
///
/// `Veo3Await` exists in the stage vocabulary for generated-clip runs but is
/// not part of [`STAGE_SEQUENCE`]; the runner and the crash-recovery scanner
/// both use the canonical sequence, so the two always agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Router,
    Research,
    Transcript,
    Content,
    LayoutDetective,
    FfmpegEngineer,
    Veo3Await,
    Assembly,
    Delivery,
    Completed,
    Failed,
}

/// Canonical processing order. Excludes the terminal states.
pub const STAGE_SEQUENCE: [Stage; 8] = [
    Stage::Router,
    Stage::Research,
    Stage::Transcript,
    Stage::Content,
    Stage::LayoutDetective,
    Stage::FfmpegEngineer,
    Stage::Assembly,
    Stage::Delivery,
];

/// Number of processing stages, for progress display.
pub const TOTAL_STAGES: usize = STAGE_SEQUENCE.len();

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Router => "router",
            Stage::Research => "research",
            Stage::Transcript => "transcript",
            Stage::Content => "content",
            Stage::LayoutDetective => "layout_detective",
            Stage::FfmpegEngineer => "ffmpeg_engineer",
            Stage::Veo3Await => "veo3_await",
            Stage::Assembly => "assembly",
            Stage::Delivery => "delivery",
            Stage::Completed => "completed",
            Stage::Failed => "failed",
        }
    }

    /// Terminal stages have no outgoing transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Completed | Stage::Failed)
    }

    /// 1-indexed position in the canonical sequence, for progress display.
    pub fn number(&self) -> Option<usize> {
        STAGE_SEQUENCE.iter().position(|s| s == self).map(|i| i + 1)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "router" => Ok(Stage::Router),
            "research" => Ok(Stage::Research),
            "transcript" => Ok(Stage::Transcript),
            "content" => Ok(Stage::Content),
            "layout_detective" => Ok(Stage::LayoutDetective),
            "ffmpeg_engineer" => Ok(Stage::FfmpegEngineer),
            "veo3_await" => Ok(Stage::Veo3Await),
            "assembly" => Ok(Stage::Assembly),
            "delivery" => Ok(Stage::Delivery),
            "completed" => Ok(Stage::Completed),
            "failed" => Ok(Stage::Failed),
            other => Err(ValidationError::new(format!("unknown stage: {other}"))),
        }
    }
}

#[cfg(test)]
#[path = "stage_tests.rs"]
mod tests;
