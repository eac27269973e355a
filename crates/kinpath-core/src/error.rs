//! Error types for Kinpath Core

use thiserror::Error;

/// Result type alias using Kinpath's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Kinpath error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Person not found: {0}")]
    PersonNotFound(String),

    #[error("Relationship not found: {from} -> {to}")]
    RelationshipNotFound { from: String, to: String },

    #[error("Invalid relationship label: {0}")]
    InvalidLabel(String),

    #[error("Validation error: {0}")]
    Validation(#[from] crate::limits::ValidationError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
