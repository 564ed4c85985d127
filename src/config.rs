//! Runtime configuration for travel-agent.
//!
//! Settings come from the environment only (a `.env` file is loaded first by
//! `main`). CLI flags override environment values, which override the
//! compiled-in defaults from [`crate::constants`].

use thiserror::Error;

use crate::constants::{
    AGENT_NAME_ENV, BASE_URL_ENV, DEFAULT_AGENT_NAME, DEFAULT_BASE_URL, DEFAULT_INSTRUCTIONS,
    DEFAULT_MAX_TURNS, DEFAULT_MODEL, INSTRUCTIONS_ENV, MAX_TURNS_ENV, MODEL_ENV, TOKEN_ENV,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("No API token found. Set {0} in the environment or a .env file")]
    MissingCredential(&'static str),
    #[error("Invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Resolved settings for one run.
#[derive(Clone)]
pub struct Config {
    /// API token, passed to the remote endpoint as-is.
    pub token: String,
    pub base_url: String,
    pub model: String,
    /// Name printed in front of each reply.
    pub agent_name: String,
    /// System instructions sent with every turn.
    pub instructions: String,
    /// Tool round-trips rig-core may take before the final reply.
    pub max_turns: usize,
}

impl Config {
    /// Loads config from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Loads config through `lookup`, which maps a variable name to its value.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let token = get(TOKEN_ENV).ok_or(ConfigError::MissingCredential(TOKEN_ENV))?;

        let max_turns = match get(MAX_TURNS_ENV) {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|e| ConfigError::Invalid {
                    var: MAX_TURNS_ENV,
                    reason: e.to_string(),
                })?,
            None => DEFAULT_MAX_TURNS,
        };
        if max_turns == 0 {
            return Err(ConfigError::Invalid {
                var: MAX_TURNS_ENV,
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            token,
            base_url: normalize_base_url(
                &get(BASE_URL_ENV).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            ),
            model: get(MODEL_ENV).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            agent_name: get(AGENT_NAME_ENV).unwrap_or_else(|| DEFAULT_AGENT_NAME.to_string()),
            instructions: get(INSTRUCTIONS_ENV)
                .unwrap_or_else(|| DEFAULT_INSTRUCTIONS.to_string()),
            max_turns,
        })
    }

    /// Applies command-line overrides on top of the loaded values.
    pub fn with_overrides(mut self, model: Option<String>, base_url: Option<String>) -> Self {
        if let Some(model) = model {
            self.model = model;
        }
        if let Some(url) = base_url {
            self.base_url = normalize_base_url(&url);
        }
        self
    }
}

/// Strips trailing slashes so request paths join cleanly.
fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("agent_name", &self.agent_name)
            .field("instructions", &self.instructions)
            .field("max_turns", &self.max_turns)
            .finish()
    }
}
