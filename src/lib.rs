//! Agent Cache Library
//!
//! A durable, content-keyed cache for transformers-agent runs. The
//! [`store::ResultStore`] persists (run signature → result) pairs across a
//! SQLite index and a blob directory, so an equivalent request never
//! re-invokes the billable remote agent; [`agent::CachedAgent`] wires the
//! compute-or-fetch logic around an opaque backend.

pub mod agent;
pub mod config;
pub mod error;
pub mod logging;
pub mod payload;
pub mod run;
pub mod store;
pub mod token;

pub use agent::{AgentBackend, CachedAgent};
pub use error::{CacheError, Result};
pub use payload::Payload;
pub use run::{RunInput, RunOutput};
pub use store::ResultStore;
pub use token::TokenManager;
