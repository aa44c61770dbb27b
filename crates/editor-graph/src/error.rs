//! Error types for the editor graph

use thiserror::Error;

/// Result type alias using GraphError
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors that can occur in graph-level operations
#[derive(Debug, Error)]
pub enum GraphError {
    /// A raw parameter value could not be converted to its declared type
    #[error("Cannot convert '{value}' to {expected}")]
    ValueConversion { value: String, expected: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GraphError {
    /// Create a value conversion error
    pub fn conversion(value: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::ValueConversion {
            value: value.into(),
            expected: expected.into(),
        }
    }
}
