//! Error types for the editor services

use thiserror::Error;

/// Result type alias using ServiceError
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Errors that can occur in the editor service layer
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A node id did not resolve in the document
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// An edge id did not resolve in the document
    #[error("Edge not found: {0}")]
    EdgeNotFound(String),

    /// An id is already taken in the document
    #[error("Duplicate id: {0}")]
    DuplicateId(String),

    /// The operation requires a task node
    #[error("Node '{0}' is not a task node")]
    NotATaskNode(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status
    #[error("Backend returned status {status}: {body}")]
    BackendStatus { status: u16, body: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
