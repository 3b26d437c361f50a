// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent prompt assembly from an [`AgentRequest`]

use rw_core::AgentRequest;

/// Fixed trailer telling the agent how to emit its outputs.
const EXECUTION_ENVIRONMENT: &str = "## Execution Environment\n\n\
You are running as an AI CLI subprocess with tool access (Bash, Read, Write, Edit).\n\
Your working directory is a dedicated workspace for this pipeline run.\n\n\
**CRITICAL OUTPUT RULES**:\n\n\
- Use the Write tool to create each output file listed in Expected Outputs above\n\
- Write files to the current working directory (not subdirectories)\n\
- For JSON outputs: write valid JSON files directly, no markdown wrapping\n\
- You may use Bash to run CLI tools (yt-dlp, ffmpeg, etc.) as needed\n\
- If you cannot write files, output ONLY the raw content to stdout as a fallback";

/// Assemble the full prompt: stage requirements, agent persona, prior
/// artifact paths, elicitation context, attempt history, and the execution
/// environment trailer.
pub fn build_agent_prompt(
    request: &AgentRequest,
    step_content: &str,
    agent_content: &str,
) -> String {
    let mut sections = Vec::with_capacity(6);

    sections.push(format!("## Stage Requirements\n\n{step_content}"));
    sections.push(format!("## Agent Definition\n\n{agent_content}"));

    if !request.prior_artifacts.is_empty() {
        let lines: Vec<String> = request
            .prior_artifacts
            .iter()
            .map(|p| format!("- {}", p.display()))
            .collect();
        sections.push(format!("## Prior Artifacts\n\n{}", lines.join("\n")));
    }

    if !request.elicitation_context.is_empty() {
        let lines: Vec<String> = request
            .elicitation_context
            .iter()
            .map(|(k, v)| format!("- {k}: {v}"))
            .collect();
        sections.push(format!("## Elicitation Context\n\n{}", lines.join("\n")));
    }

    if !request.attempt_history.is_empty() {
        let mut parts = Vec::with_capacity(request.attempt_history.len());
        for (i, attempt) in request.attempt_history.iter().enumerate() {
            let lines: Vec<String> = attempt.iter().map(|(k, v)| format!("  - {k}: {v}")).collect();
            parts.push(format!("### Attempt {}\n{}", i + 1, lines.join("\n")));
        }
        sections.push(format!("## Attempt History\n\n{}", parts.join("\n\n")));
    }

    sections.push(EXECUTION_ENVIRONMENT.to_string());
    sections.join("\n\n")
}

#[cfg(test)]
#[path = "prompt_tests.rs"]
mod tests;
