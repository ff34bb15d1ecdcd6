//! Cache-aware agent runner
//!
//! The remote agent call is an opaque, billable, non-deterministic operation
//! behind the [`AgentBackend`] trait. [`CachedAgent`] implements the caller
//! contract around it: check the store first, bypass the remote call entirely
//! on a hit, and write the produced output back after a successful call.
//! A failed call writes nothing, so no partial record ever reaches the index.

use crate::config::AgentRegistry;
use crate::error::{CacheError, Result};
use crate::logging::CacheMetrics;
use crate::run::{RunInput, RunOutput};
use crate::store::ResultStore;
use crate::token::TokenManager;

/// The remote agent invocation seam.
///
/// Implementations perform the actual network call; timeouts and retries
/// live there, not in the cache.
pub trait AgentBackend {
    /// Run the task remotely and return the produced output
    fn run(&self, input: &RunInput, token: &str) -> Result<RunOutput>;
}

/// Compute-or-fetch wrapper around an [`AgentBackend`]
pub struct CachedAgent<B> {
    backend: B,
    store: ResultStore,
    tokens: TokenManager,
    registry: AgentRegistry,
    use_cache: bool,
    metrics: CacheMetrics,
}

impl<B: AgentBackend> CachedAgent<B> {
    pub fn new(backend: B, store: ResultStore, tokens: TokenManager) -> Self {
        CachedAgent {
            backend,
            store,
            tokens,
            registry: AgentRegistry::builtin(),
            use_cache: true,
            metrics: CacheMetrics::new(),
        }
    }

    /// Replace the built-in agent registry
    pub fn with_registry(mut self, registry: AgentRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Disable the cache: every run invokes the backend
    pub fn without_cache(mut self) -> Self {
        self.use_cache = false;
        self
    }

    /// Hit/miss counters for this runner
    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    /// The underlying store
    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    /// Run the task, serving it from the cache when an equivalent run has
    /// already been answered.
    pub fn run(&self, input: &RunInput) -> Result<RunOutput> {
        // Reject unknown agent/model pairs before spending anything
        self.registry.model(&input.agent, &input.model)?;

        if self.use_cache {
            if let Some(output) = self.store.read(input)? {
                self.metrics.record_hit();
                tracing::info!(
                    agent = %input.agent,
                    model = %input.model,
                    task = %input.task,
                    "cache hit"
                );
                return Ok(output);
            }
            self.metrics.record_miss();
        }

        let token = self
            .tokens
            .get(&input.agent)
            .ok_or_else(|| CacheError::NoToken {
                agent: input.agent.clone(),
            })?;

        let output = self.backend.run(input, token)?;
        self.store.write(input, &output)?;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use tempfile::tempdir;

    use super::*;
    use crate::payload::Payload;

    /// Backend that counts invocations and returns a canned answer
    struct MockBackend {
        calls: Cell<u64>,
        fail: bool,
    }

    impl MockBackend {
        fn new() -> Self {
            MockBackend {
                calls: Cell::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            MockBackend {
                calls: Cell::new(0),
                fail: true,
            }
        }
    }

    impl AgentBackend for MockBackend {
        fn run(&self, input: &RunInput, _token: &str) -> Result<RunOutput> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(CacheError::AgentRun("rate limit exceeded".to_string()));
            }
            Ok(RunOutput::new(Payload::text(format!("answer to {}", input.task))))
        }
    }

    fn runner_with(backend: MockBackend, dir: &std::path::Path) -> CachedAgent<MockBackend> {
        let store = ResultStore::open(dir).unwrap();
        let mut tokens = TokenManager::default();
        tokens.set("HuggingFace", "hf_test");
        CachedAgent::new(backend, store, tokens)
    }

    fn sample_input() -> RunInput {
        RunInput::new("HuggingFace", "Starcoder", "task-X")
    }

    #[test]
    fn test_miss_invokes_backend_once_and_writes_back() {
        let dir = tempdir().unwrap();
        let runner = runner_with(MockBackend::new(), dir.path());
        let input = sample_input();

        let output = runner.run(&input).unwrap();
        assert_eq!(output.value.as_text(), Some("answer to task-X"));
        assert_eq!(runner.backend.calls.get(), 1);
        assert!(runner.store().exists(&input).unwrap());
        assert_eq!(runner.metrics().misses(), 1);
    }

    #[test]
    fn test_hit_bypasses_backend() {
        let dir = tempdir().unwrap();
        let runner = runner_with(MockBackend::new(), dir.path());
        let input = sample_input();

        let first = runner.run(&input).unwrap();
        let second = runner.run(&input).unwrap();

        assert_eq!(first, second);
        assert_eq!(runner.backend.calls.get(), 1);
        assert_eq!(runner.metrics().hits(), 1);
        assert_eq!(runner.metrics().misses(), 1);
    }

    #[test]
    fn test_cache_disabled_always_invokes_backend() {
        let dir = tempdir().unwrap();
        let runner = runner_with(MockBackend::new(), dir.path()).without_cache();
        let input = sample_input();

        runner.run(&input).unwrap();
        runner.run(&input).unwrap();
        assert_eq!(runner.backend.calls.get(), 2);
        assert_eq!(runner.metrics().total_lookups(), 0);
    }

    #[test]
    fn test_failed_run_writes_nothing() {
        let dir = tempdir().unwrap();
        let runner = runner_with(MockBackend::failing(), dir.path());
        let input = sample_input();

        let err = runner.run(&input).unwrap_err();
        assert!(matches!(err, CacheError::AgentRun(_)));
        assert!(!runner.store().exists(&input).unwrap());
    }

    #[test]
    fn test_missing_token_fails_before_backend() {
        let dir = tempdir().unwrap();
        let store = ResultStore::open(dir.path()).unwrap();
        let runner = CachedAgent::new(MockBackend::new(), store, TokenManager::default());

        let err = runner.run(&sample_input()).unwrap_err();
        match err {
            CacheError::NoToken { agent } => assert_eq!(agent, "HuggingFace"),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(runner.backend.calls.get(), 0);
    }

    #[test]
    fn test_unknown_model_rejected() {
        let dir = tempdir().unwrap();
        let runner = runner_with(MockBackend::new(), dir.path());

        let input = RunInput::new("HuggingFace", "NotAModel", "task");
        let err = runner.run(&input).unwrap_err();
        assert!(matches!(err, CacheError::UnknownModel { .. }));
        assert_eq!(runner.backend.calls.get(), 0);
    }
}
