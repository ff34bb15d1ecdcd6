//! Error types for agent-cache
//!
//! A cache miss is not an error: `exists` returns `false` and `read` returns
//! `Ok(None)`. Everything below is a real failure and propagates unchanged to
//! the caller; the store performs no retries.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during agent-cache operations
#[derive(Error, Debug)]
pub enum CacheError {
    // Data/store errors
    #[error("unsupported blob type: {extension} (supported: {supported})")]
    UnsupportedBlobType { extension: String, supported: String },

    #[error("blob missing for cached record: {path:?}")]
    MissingBlob { path: PathBuf },

    #[error("invalid image payload: {reason}")]
    InvalidImage { reason: String },

    #[error("failed to {operation}: {reason}")]
    FailedOperation { operation: String, reason: String },

    // Configuration/runner errors
    #[error("unknown agent: {agent} (known: {known})")]
    UnknownAgent { agent: String, known: String },

    #[error("unknown model {model} for agent {agent} (known: {known})")]
    UnknownModel {
        agent: String,
        model: String,
        known: String,
    },

    #[error("no token found for agent: {agent}")]
    NoToken { agent: String },

    #[error("agent run failed: {0}")]
    AgentRun(String),

    // Generic failures
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

impl From<rusqlite::Error> for CacheError {
    fn from(err: rusqlite::Error) -> Self {
        CacheError::Other(err.to_string())
    }
}

impl CacheError {
    /// Create an error for a failed database operation
    pub fn db_operation(operation: &str, error: impl std::fmt::Display) -> Self {
        CacheError::FailedOperation {
            operation: operation.to_string(),
            reason: error.to_string(),
        }
    }

    /// Create an error for a failed IO operation with the affected path
    pub fn io_operation(
        operation: &str,
        path: impl std::fmt::Display,
        error: impl std::fmt::Display,
    ) -> Self {
        CacheError::FailedOperation {
            operation: format!("{} {}", operation, path),
            reason: error.to_string(),
        }
    }

    /// Create an unsupported-blob-type error naming the supported extensions
    pub fn unsupported_blob_type(extension: impl Into<String>) -> Self {
        CacheError::UnsupportedBlobType {
            extension: extension.into(),
            supported: crate::payload::SUPPORTED_EXTENSIONS.join(", "),
        }
    }
}

/// Result type alias for agent-cache operations
pub type Result<T> = std::result::Result<T, CacheError>;
