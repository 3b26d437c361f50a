// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! QA gate verdicts and the reflection-loop result

use crate::error::ValidationError;
use crate::id::GateName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// QA gate verdict for a stage's artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QaDecision {
    #[serde(rename = "PASS")]
    Pass,
    #[serde(rename = "REWORK")]
    Rework,
    #[serde(rename = "FAIL")]
    Fail,
}

impl QaDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            QaDecision::Pass => "PASS",
            QaDecision::Rework => "REWORK",
            QaDecision::Fail => "FAIL",
        }
    }
}

impl fmt::Display for QaDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// QA evaluation status for the current pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QaStatus {
    Pending,
    Passed,
    Rework,
    Failed,
}

impl QaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QaStatus::Pending => "pending",
            QaStatus::Passed => "passed",
            QaStatus::Rework => "rework",
            QaStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for QaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured QA gate evaluation of one agent attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaCritique {
    pub decision: QaDecision,
    /// 0-100
    pub score: u8,
    pub gate: GateName,
    /// 1-indexed attempt this critique grades
    pub attempt: u32,
    /// Each blocker is a string map carrying at least severity and description
    pub blockers: Vec<BTreeMap<String, String>>,
    /// Exact fix instructions fed back to the agent on rework
    pub prescriptive_fixes: Vec<String>,
    /// 0.0-1.0
    pub confidence: f64,
}

impl QaCritique {
    /// Validate field ranges. Score 0-100, confidence 0.0-1.0, attempt >= 1.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.score > 100 {
            return Err(ValidationError::new(format!(
                "score must be 0-100, got {}",
                self.score
            )));
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(ValidationError::new(format!(
                "confidence must be 0.0-1.0, got {}",
                self.confidence
            )));
        }
        if self.attempt < 1 {
            return Err(ValidationError::new(format!(
                "attempt must be >= 1, got {}",
                self.attempt
            )));
        }
        Ok(())
    }
}

/// Output of the reflection loop for a stage.
#[derive(Debug, Clone, PartialEq)]
pub struct ReflectionResult {
    /// Highest-scoring critique across the attempts taken
    pub best_critique: QaCritique,
    /// Artifacts from the attempt that produced the best critique
    pub artifacts: Vec<PathBuf>,
    /// Number of agent executions consumed (>= 1)
    pub attempts: u32,
    /// True when the best score fell below the pass floor
    pub escalation_needed: bool,
}

#[cfg(test)]
#[path = "qa_tests.rs"]
mod tests;
