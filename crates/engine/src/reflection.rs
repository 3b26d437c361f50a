// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Generator-Critic QA loop with rework and best-of-N selection.
//!
//! The agent produces artifacts, the QA model grades them against the
//! gate's criteria, and REWORK verdicts feed prescriptive fixes back into a
//! rebuilt request. After the attempt ceiling (or a FAIL), the
//! highest-scoring attempt wins; a best score under the pass floor signals
//! escalation.

use crate::error::PipelineError;
use rw_adapters::{AgentExecutionPort, ModelDispatchPort};
use rw_core::{
    AgentRequest, AgentResult, GateName, QaCritique, QaDecision, ReflectionResult, MAX_QA_ATTEMPTS,
};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

/// Best-of-N results under this score trigger escalation.
pub const MIN_PASS_SCORE: u8 = 40;

/// Role identifier for QA calls on the model-dispatch port.
pub const QA_ROLE: &str = "qa_evaluator";

/// Errors parsing the QA model's response.
///
/// Treated as agent-class failures for recovery purposes: the recovery
/// chain will typically fork to a fresh session.
#[derive(Debug, Error)]
pub enum QaError {
    #[error("QA response is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("QA response is not a JSON object")]
    NotAnObject,
    #[error("invalid or missing 'decision' in QA response: {0}")]
    InvalidDecision(String),
    #[error("invalid field values in QA response: {0}")]
    InvalidField(String),
    #[error("no QA attempts to select from")]
    NoAttempts,
}

/// Drives one stage's agent through its QA gate.
#[derive(Clone)]
pub struct ReflectionLoop<A, M> {
    agent: A,
    model: M,
    min_pass_score: u8,
}

impl<A, M> ReflectionLoop<A, M>
where
    A: AgentExecutionPort,
    M: ModelDispatchPort,
{
    pub fn new(agent: A, model: M) -> Self {
        Self::with_min_pass_score(agent, model, MIN_PASS_SCORE)
    }

    pub fn with_min_pass_score(agent: A, model: M, min_pass_score: u8) -> Self {
        Self {
            agent,
            model,
            min_pass_score,
        }
    }

    /// Execute the full agent -> QA -> rework cycle.
    pub async fn run(
        &self,
        request: &AgentRequest,
        gate: &GateName,
        gate_criteria: &str,
    ) -> Result<ReflectionResult, PipelineError> {
        let mut attempts: Vec<(QaCritique, AgentResult)> = Vec::new();
        let mut current = request.clone();

        for attempt_num in 1..=MAX_QA_ATTEMPTS {
            let result = self.agent.execute(&current).await?;
            let critique = self
                .evaluate(&result.artifacts, gate, gate_criteria, attempt_num)
                .await?;

            info!(
                gate = %gate,
                attempt = attempt_num,
                decision = %critique.decision,
                score = critique.score,
                "QA gate evaluated"
            );

            let decision = critique.decision;
            attempts.push((critique, result));

            match decision {
                QaDecision::Pass => {
                    // The passing attempt wins outright, whatever earlier
                    // attempts scored
                    let Some((critique, result)) = attempts.pop() else {
                        return Err(QaError::NoAttempts.into());
                    };
                    return Ok(ReflectionResult {
                        best_critique: critique,
                        artifacts: result.artifacts,
                        attempts: attempt_num,
                        escalation_needed: false,
                    });
                }
                // FAIL means no rework can help; skip to best-of-N
                QaDecision::Fail => break,
                QaDecision::Rework => {
                    if attempt_num < MAX_QA_ATTEMPTS {
                        if let Some((critique, _)) = attempts.last() {
                            current = current.with_history_entry(feedback_entry(critique));
                        }
                    }
                }
            }
        }

        let taken = attempts.len() as u32;
        let (best, result) = take_best(attempts)?;
        let escalation_needed = best.score < self.min_pass_score;

        info!(
            gate = %gate,
            attempts = taken,
            best_score = best.score,
            escalation = escalation_needed,
            "best-of-N selected"
        );

        Ok(ReflectionResult {
            best_critique: best,
            artifacts: result.artifacts,
            attempts: taken,
            escalation_needed,
        })
    }

    /// Grade artifacts against the gate via the model-dispatch port.
    pub async fn evaluate(
        &self,
        artifacts: &[PathBuf],
        gate: &GateName,
        gate_criteria: &str,
        attempt: u32,
    ) -> Result<QaCritique, PipelineError> {
        let prompt = build_qa_prompt(artifacts, gate, gate_criteria, attempt);
        let raw = self.model.dispatch(QA_ROLE, &prompt, None).await?;
        Ok(parse_critique(&raw, gate, attempt)?)
    }
}

/// QA prompt listing the gate, its criteria, and the artifact paths.
fn build_qa_prompt(artifacts: &[PathBuf], gate: &GateName, criteria: &str, attempt: u32) -> String {
    let artifact_list = artifacts
        .iter()
        .map(|p| format!("- {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "## QA Gate Evaluation: {gate}\n\n\
         ### Gate Criteria\n\n{criteria}\n\n\
         ### Artifacts to Evaluate\n\n{artifact_list}\n\n\
         ### Attempt: {attempt}\n\n\
         Evaluate the artifacts against the gate criteria. \
         Respond with ONLY a JSON object matching this exact schema:\n\
         {{\"decision\": \"PASS|REWORK|FAIL\", \"score\": 0-100, \"gate\": \"<gate_name>\", \
         \"attempt\": <int>, \"blockers\": [{{\"severity\": \"...\", \"description\": \"...\"}}], \
         \"prescriptive_fixes\": [\"exact fix instruction\"], \"confidence\": 0.0-1.0}}"
    )
}

/// Summarize a critique as a flat string map for the attempt history.
fn feedback_entry(critique: &QaCritique) -> BTreeMap<String, String> {
    let blockers = critique
        .blockers
        .iter()
        .filter_map(|b| b.get("description").cloned())
        .collect::<Vec<_>>()
        .join("; ");
    let mut entry = BTreeMap::new();
    entry.insert("attempt".to_string(), critique.attempt.to_string());
    entry.insert("decision".to_string(), critique.decision.to_string());
    entry.insert("score".to_string(), critique.score.to_string());
    entry.insert(
        "prescriptive_fixes".to_string(),
        critique.prescriptive_fixes.join("; "),
    );
    entry.insert("blockers".to_string(), blockers);
    entry
}

/// Highest score wins; ties break to the earliest attempt.
fn take_best(
    attempts: Vec<(QaCritique, AgentResult)>,
) -> Result<(QaCritique, AgentResult), QaError> {
    let mut best: Option<(QaCritique, AgentResult)> = None;
    for pair in attempts {
        match &best {
            Some((current, _)) if pair.0.score <= current.score => {}
            _ => best = Some(pair),
        }
    }
    best.ok_or(QaError::NoAttempts)
}

/// Parse the QA model's JSON (tolerating Markdown fences) into a critique.
pub fn parse_critique(raw: &str, gate: &GateName, attempt: u32) -> Result<QaCritique, QaError> {
    let cleaned: String = if raw.trim_start().starts_with("```") {
        raw.lines()
            .filter(|line| !line.trim_start().starts_with("```"))
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        raw.to_string()
    };

    let value: Value =
        serde_json::from_str(cleaned.trim()).map_err(|e| QaError::InvalidJson(e.to_string()))?;
    let object = value.as_object().ok_or(QaError::NotAnObject)?;

    let decision = match object.get("decision").and_then(Value::as_str) {
        Some("PASS") => QaDecision::Pass,
        Some("REWORK") => QaDecision::Rework,
        Some("FAIL") => QaDecision::Fail,
        Some(other) => return Err(QaError::InvalidDecision(other.to_string())),
        None => return Err(QaError::InvalidDecision("missing".to_string())),
    };

    let score = object
        .get("score")
        .map(|v| {
            v.as_u64()
                .filter(|s| *s <= 100)
                .ok_or_else(|| QaError::InvalidField(format!("score: {v}")))
        })
        .transpose()?
        .unwrap_or(0) as u8;

    let confidence = object
        .get("confidence")
        .map(|v| {
            v.as_f64()
                .filter(|c| (0.0..=1.0).contains(c))
                .ok_or_else(|| QaError::InvalidField(format!("confidence: {v}")))
        })
        .transpose()?
        .unwrap_or(0.0);

    let blockers = object
        .get("blockers")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(Value::as_object)
                .map(|b| {
                    b.iter()
                        .map(|(k, v)| {
                            let text = v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string());
                            (k.clone(), text)
                        })
                        .collect::<BTreeMap<String, String>>()
                })
                .collect()
        })
        .unwrap_or_default();

    let prescriptive_fixes = object
        .get("prescriptive_fixes")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                .collect()
        })
        .unwrap_or_default();

    Ok(QaCritique {
        decision,
        score,
        gate: gate.clone(),
        attempt,
        blockers,
        prescriptive_fixes,
        confidence,
    })
}

#[cfg(test)]
#[path = "reflection_tests.rs"]
mod tests;
