//! Error types for the underwriting orchestrator

use thiserror::Error;

/// Result type alias for underwriting operations
pub type Result<T> = std::result::Result<T, UnderwritingError>;

#[derive(Error, Debug)]
pub enum UnderwritingError {
    /// The language model collaborator failed (network, auth, quota).
    /// This is the only failure that aborts an analysis run; search failures
    /// and unparseable model replies are absorbed lower down.
    #[error("Language model error: {0}")]
    Model(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
