// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-stage workflow files and gate names

use rw_core::Stage;
use std::path::{Path, PathBuf};

/// Workflow inputs for one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageSpec {
    pub stage: Stage,
    /// Stage-description file under the workflows directory
    pub step_file: &'static str,
    /// Agent persona name under `agents/`
    pub agent: &'static str,
    /// QA gate name; criteria live under `gates/`
    pub gate: &'static str,
}

/// All processing stages in canonical order.
pub const STAGE_SPECS: [StageSpec; 8] = [
    StageSpec {
        stage: Stage::Router,
        step_file: "stage-01-router.md",
        agent: "router",
        gate: "router",
    },
    StageSpec {
        stage: Stage::Research,
        step_file: "stage-02-research.md",
        agent: "research",
        gate: "research",
    },
    StageSpec {
        stage: Stage::Transcript,
        step_file: "stage-03-transcript.md",
        agent: "transcript",
        gate: "transcript",
    },
    StageSpec {
        stage: Stage::Content,
        step_file: "stage-04-content.md",
        agent: "content-creator",
        gate: "content",
    },
    StageSpec {
        stage: Stage::LayoutDetective,
        step_file: "stage-05-layout-detective.md",
        agent: "layout-detective",
        gate: "layout",
    },
    StageSpec {
        stage: Stage::FfmpegEngineer,
        step_file: "stage-06-ffmpeg-engineer.md",
        agent: "ffmpeg-engineer",
        gate: "ffmpeg",
    },
    StageSpec {
        stage: Stage::Assembly,
        step_file: "stage-07-assembly.md",
        agent: "qa",
        gate: "assembly",
    },
    StageSpec {
        stage: Stage::Delivery,
        step_file: "stage-08-delivery.md",
        agent: "delivery",
        gate: "delivery",
    },
];

/// Spec for a stage; `None` for terminal stages and `veo3_await`.
pub fn stage_spec(stage: Stage) -> Option<&'static StageSpec> {
    STAGE_SPECS.iter().find(|spec| spec.stage == stage)
}

impl StageSpec {
    pub fn step_path(&self, workflows_dir: &Path) -> PathBuf {
        workflows_dir.join(self.step_file)
    }

    pub fn agent_path(&self, workflows_dir: &Path) -> PathBuf {
        workflows_dir.join("agents").join(format!("{}.md", self.agent))
    }

    pub fn gate_path(&self, workflows_dir: &Path) -> PathBuf {
        workflows_dir.join("gates").join(format!("{}.md", self.gate))
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
