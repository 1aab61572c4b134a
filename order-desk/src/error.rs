//! Error types for the order desk
//!
//! Store operations never fail: malformed input falls back to defaults and an
//! empty result is a valid state. Only the boundaries with external
//! collaborators (catalog loading, order delivery, preference persistence)
//! produce errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeskError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Catalog source could not be interpreted at all
    #[error("Malformed catalog source: {0}")]
    MalformedSource(String),

    /// Export or order delivery failed; store state is unaffected
    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Config error: {0}")]
    Config(String),
}

/// Result type for order desk operations
pub type DeskResult<T> = Result<T, DeskError>;
