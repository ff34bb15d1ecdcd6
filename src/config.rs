//! Agent and model configuration
//!
//! The registry maps agent names to the models they support and each model's
//! invocation parameters. Built-in defaults cover the Hugging Face inference
//! endpoints and OpenAI; a registry can also be loaded from a TOML file.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

/// Agent used when the caller does not pick one
pub const DEFAULT_AGENT: &str = "HuggingFace";

/// Parameters needed to invoke one model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Inference endpoint URL (Hugging Face style agents)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_endpoint: Option<String>,
    /// Provider-side model identifier (OpenAI style agents)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// One agent's model table and its default model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub default_model: String,
    pub models: BTreeMap<String, ModelConfig>,
}

/// Registry of all configured agents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRegistry {
    agents: BTreeMap<String, AgentConfig>,
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl AgentRegistry {
    /// The built-in registry: Hugging Face inference endpoints and OpenAI
    pub fn builtin() -> Self {
        let mut hf_models = BTreeMap::new();
        hf_models.insert(
            "OpenAssistant".to_string(),
            ModelConfig {
                url_endpoint: Some(
                    "https://api-inference.huggingface.co/models/OpenAssistant/oasst-sft-4-pythia-12b-epoch-3.5"
                        .to_string(),
                ),
                model: None,
            },
        );
        hf_models.insert(
            "Starcoder".to_string(),
            ModelConfig {
                url_endpoint: Some(
                    "https://api-inference.huggingface.co/models/bigcode/starcoder".to_string(),
                ),
                model: None,
            },
        );
        hf_models.insert(
            "StarcoderBase".to_string(),
            ModelConfig {
                url_endpoint: Some(
                    "https://api-inference.huggingface.co/models/bigcode/starcoderbase".to_string(),
                ),
                model: None,
            },
        );

        let mut openai_models = BTreeMap::new();
        openai_models.insert(
            "text-davinci-003".to_string(),
            ModelConfig {
                url_endpoint: None,
                model: Some("text-davinci-003".to_string()),
            },
        );

        let mut agents = BTreeMap::new();
        agents.insert(
            "HuggingFace".to_string(),
            AgentConfig {
                default_model: "StarcoderBase".to_string(),
                models: hf_models,
            },
        );
        agents.insert(
            "OpenAI".to_string(),
            AgentConfig {
                default_model: "text-davinci-003".to_string(),
                models: openai_models,
            },
        );

        AgentRegistry { agents }
    }

    /// Load a registry from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let registry: AgentRegistry = toml::from_str(&content)?;
        Ok(registry)
    }

    /// Agent names, sorted
    pub fn agent_names(&self) -> Vec<&str> {
        self.agents.keys().map(String::as_str).collect()
    }

    /// Look up an agent's configuration
    pub fn agent(&self, name: &str) -> Result<&AgentConfig> {
        self.agents.get(name).ok_or_else(|| CacheError::UnknownAgent {
            agent: name.to_string(),
            known: self.agent_names().join(", "),
        })
    }

    /// Look up the invocation parameters for (agent, model)
    pub fn model(&self, agent: &str, model: &str) -> Result<&ModelConfig> {
        let config = self.agent(agent)?;
        config
            .models
            .get(model)
            .ok_or_else(|| CacheError::UnknownModel {
                agent: agent.to_string(),
                model: model.to_string(),
                known: config
                    .models
                    .keys()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}
