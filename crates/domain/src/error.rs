//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A category index does not exist in the loaded catalog.
    #[error("unknown category index: {0}")]
    UnknownCategory(usize),

    /// An endpoint index does not exist in its category.
    #[error("unknown endpoint {endpoint} in category {category}")]
    UnknownEndpoint {
        /// Category index.
        category: usize,
        /// Endpoint index within the category.
        endpoint: usize,
    },

    /// A parameter name is not declared by the selected endpoint.
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    /// The query string for a probe could not be encoded.
    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
