//! API token lookup for the configured agents
//!
//! The store itself never sees credentials; this is the interface the runner
//! uses to resolve a bearer token before an uncached remote call.

use std::collections::BTreeMap;

/// Environment variable holding the Hugging Face API token
pub const HUGGING_FACE_TOKEN_ENV: &str = "HUGGING_FACE_TOKEN";
/// Environment variable holding the OpenAI API token
pub const OPEN_AI_TOKEN_ENV: &str = "OPEN_AI_TOKEN";

fn env_var_for(agent: &str) -> Option<&'static str> {
    match agent {
        "HuggingFace" => Some(HUGGING_FACE_TOKEN_ENV),
        "OpenAI" => Some(OPEN_AI_TOKEN_ENV),
        _ => None,
    }
}

/// Per-agent API tokens, from explicit values or environment variables.
///
/// Environment variables are snapshotted at construction time. An explicitly
/// set token takes precedence over the environment.
#[derive(Debug, Clone, Default)]
pub struct TokenManager {
    overrides: BTreeMap<String, String>,
    env: BTreeMap<String, String>,
}

impl TokenManager {
    /// Create a manager with tokens snapshotted from the environment
    pub fn new() -> Self {
        let mut env = BTreeMap::new();
        for agent in ["HuggingFace", "OpenAI"] {
            if let Some(var) = env_var_for(agent) {
                if let Ok(value) = std::env::var(var) {
                    if !value.is_empty() {
                        env.insert(agent.to_string(), value);
                    }
                }
            }
        }
        TokenManager {
            overrides: BTreeMap::new(),
            env,
        }
    }

    /// Set an explicit token for an agent, overriding the environment
    pub fn set(&mut self, agent: impl Into<String>, token: impl Into<String>) {
        self.overrides.insert(agent.into(), token.into());
    }

    /// True if the environment provided a token for the agent
    pub fn env_exists(&self, agent: &str) -> bool {
        self.env.contains_key(agent)
    }

    /// Returns the token for the agent.
    ///
    /// An explicitly set token wins, then the environment snapshot; `None`
    /// when neither is set or the agent is unknown.
    pub fn get(&self, agent: &str) -> Option<&str> {
        self.overrides
            .get(agent)
            .or_else(|| self.env.get(agent))
            .map(String::as_str)
            .filter(|token| !token.is_empty())
    }
}
