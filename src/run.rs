//! Run input and output models
//!
//! `RunInput` is the cache signature: two runs with equal signature fields
//! are considered equivalent regardless of when they were issued. Equality is
//! exact field equality; no trimming or case-folding is performed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::payload::Payload;

/// The input arguments of a run, used as the cache lookup key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunInput {
    pub agent: String,
    pub model: String,
    pub task: String,
    /// Auxiliary arguments forwarded to the agent. Part of the indexed
    /// signature; a `BTreeMap` keeps the serialized form deterministic.
    #[serde(default)]
    pub kwargs: BTreeMap<String, serde_json::Value>,
}

impl RunInput {
    pub fn new(
        agent: impl Into<String>,
        model: impl Into<String>,
        task: impl Into<String>,
    ) -> Self {
        RunInput {
            agent: agent.into(),
            model: model.into(),
            task: task.into(),
            kwargs: BTreeMap::new(),
        }
    }

    /// Add an auxiliary argument
    pub fn with_kwarg(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.kwargs.insert(key.into(), value);
        self
    }

    /// Canonical serialization of the kwargs, as stored in the index
    pub(crate) fn kwargs_key(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.kwargs)?)
    }
}

/// The output of a completed run
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutput {
    /// The produced result
    pub value: Payload,
    /// The full prompt the agent generated for the task
    pub prompt: String,
    /// The agent's explanation of its approach
    pub explanation: String,
    /// The code the agent generated and executed
    pub code: String,
}

impl RunOutput {
    pub fn new(value: Payload) -> Self {
        RunOutput {
            value,
            prompt: String::new(),
            explanation: String::new(),
            code: String::new(),
        }
    }

    pub fn with_trace(
        mut self,
        prompt: impl Into<String>,
        explanation: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        self.prompt = prompt.into();
        self.explanation = explanation.into();
        self.code = code.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kwargs_key_is_order_independent() {
        let a = RunInput::new("HuggingFace", "Starcoder", "task")
            .with_kwarg("seed", json!(7))
            .with_kwarg("width", json!(512));
        let b = RunInput::new("HuggingFace", "Starcoder", "task")
            .with_kwarg("width", json!(512))
            .with_kwarg("seed", json!(7));

        assert_eq!(a, b);
        assert_eq!(a.kwargs_key().unwrap(), b.kwargs_key().unwrap());
    }

    #[test]
    fn test_kwargs_key_distinguishes_values() {
        let a = RunInput::new("A", "B", "C").with_kwarg("seed", json!(1));
        let b = RunInput::new("A", "B", "C").with_kwarg("seed", json!(2));
        assert_ne!(a.kwargs_key().unwrap(), b.kwargs_key().unwrap());
    }

    #[test]
    fn test_empty_kwargs_key() {
        let input = RunInput::new("A", "B", "C");
        assert_eq!(input.kwargs_key().unwrap(), "{}");
    }
}
