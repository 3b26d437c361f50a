// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration from environment variables.
//!
//! Secrets (the chat credentials) only ever come from the environment;
//! path and tuning settings have working-directory-relative defaults
//! matching the deployment unit.

use crate::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Default agent subprocess deadline.
const DEFAULT_AGENT_TIMEOUT: Duration = Duration::from_secs(300);

/// Hard floor for the agent deadline; anything lower starves real runs.
const MIN_AGENT_TIMEOUT: Duration = Duration::from_secs(30);

const DEFAULT_MIN_QA_SCORE: u8 = 40;

/// Boot-time configuration failures. Fatal: the loop never starts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("CHAT_CHAT_ID is required when CHAT_TOKEN is set")]
    MissingChatId,
    #[error("CHAT_TOKEN is required when CHAT_CHAT_ID is set")]
    MissingChatToken,
    #[error("invalid {name}: {value}")]
    InvalidValue { name: String, value: String },
}

/// Fully-resolved daemon settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub chat_token: Option<String>,
    pub chat_chat_id: Option<String>,
    pub workspace_dir: PathBuf,
    pub queue_dir: PathBuf,
    pub config_dir: PathBuf,
    pub workflows_dir: PathBuf,
    pub agent_timeout: Duration,
    pub min_qa_score: u8,
    /// External AI CLI binary that executes agents and QA dispatches
    pub agent_cli: String,
}

impl Settings {
    /// Load from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(env::var)
    }

    /// Load via an arbitrary lookup (tests pass a map).
    pub fn load_from(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let chat_token = lookup(env::CHAT_TOKEN);
        let chat_chat_id = lookup(env::CHAT_CHAT_ID);
        match (&chat_token, &chat_chat_id) {
            (Some(_), None) => return Err(ConfigError::MissingChatId),
            (None, Some(_)) => return Err(ConfigError::MissingChatToken),
            _ => {}
        }

        let path = |name: &str, default: &str| {
            lookup(name).map(PathBuf::from).unwrap_or_else(|| PathBuf::from(default))
        };

        let agent_timeout = match lookup(env::AGENT_TIMEOUT_SECONDS) {
            None => DEFAULT_AGENT_TIMEOUT,
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) => Duration::from_secs(secs).max(MIN_AGENT_TIMEOUT),
                Err(_) => {
                    return Err(ConfigError::InvalidValue {
                        name: env::AGENT_TIMEOUT_SECONDS.to_string(),
                        value: raw,
                    })
                }
            },
        };

        let min_qa_score = match lookup(env::MIN_QA_SCORE) {
            None => DEFAULT_MIN_QA_SCORE,
            Some(raw) => match raw.parse::<u8>() {
                Ok(score) if score <= 100 => score,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: env::MIN_QA_SCORE.to_string(),
                        value: raw,
                    })
                }
            },
        };

        Ok(Self {
            chat_token,
            chat_chat_id,
            workspace_dir: path(env::WORKSPACE_DIR, "workspace"),
            queue_dir: path(env::QUEUE_DIR, "queue"),
            config_dir: path(env::CONFIG_DIR, "config"),
            workflows_dir: path(env::WORKFLOWS_DIR, "workflows"),
            agent_timeout,
            min_qa_score,
            agent_cli: lookup(env::AGENT_CLI).unwrap_or_else(|| "claude".to_string()),
        })
    }

    /// Whether both chat credentials are present.
    pub fn chat_enabled(&self) -> bool {
        self.chat_token.is_some() && self.chat_chat_id.is_some()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
