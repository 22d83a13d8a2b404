//! Error handling module for windebloat
//!
//! Provides centralized error handling with proper error types using thiserror.
//! Registry-contract violations (duplicate or unknown action ids) are the only
//! errors raised to callers before a run starts; execution-time faults are
//! captured per action and turned into data (see `RunResult`), never raised.

use thiserror::Error;

/// Main error type for windebloat
#[derive(Error, Debug)]
pub enum DebloatError {
    /// An action with this id is already registered
    #[error("duplicate action id: {0}")]
    DuplicateId(String),

    /// No action with this id exists in the registry
    #[error("unknown action id: {0}")]
    UnknownId(String),

    /// IO errors (spawning processes, terminal, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// System errors (commands, processes)
    #[error("system error: {0}")]
    System(String),
}

/// Result type alias for windebloat operations
pub type Result<T> = std::result::Result<T, DebloatError>;

// Convenient error constructors
impl DebloatError {
    /// Create a duplicate-id error
    pub fn duplicate_id(id: impl Into<String>) -> Self {
        Self::DuplicateId(id.into())
    }

    /// Create an unknown-id error
    pub fn unknown_id(id: impl Into<String>) -> Self {
        Self::UnknownId(id.into())
    }

    /// Create a system error
    pub fn system(msg: impl Into<String>) -> Self {
        Self::System(msg.into())
    }
}
