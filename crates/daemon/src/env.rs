// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable names for the daemon crate

pub const CHAT_TOKEN: &str = "CHAT_TOKEN";
pub const CHAT_CHAT_ID: &str = "CHAT_CHAT_ID";
pub const WORKSPACE_DIR: &str = "WORKSPACE_DIR";
pub const QUEUE_DIR: &str = "QUEUE_DIR";
pub const CONFIG_DIR: &str = "CONFIG_DIR";
pub const WORKFLOWS_DIR: &str = "WORKFLOWS_DIR";
pub const AGENT_TIMEOUT_SECONDS: &str = "AGENT_TIMEOUT_SECONDS";
pub const MIN_QA_SCORE: &str = "MIN_QA_SCORE";
pub const AGENT_CLI: &str = "AGENT_CLI";

/// Read one variable from the process environment, treating empty values
/// as unset.
pub fn var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
