//! Matching engine error types

use thiserror::Error;

/// Errors that can occur while accepting or reading order events
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchingError {
    /// Event failed validation before reaching a book
    #[error("Invalid order {id}: {reason}")]
    InvalidOrder { id: String, reason: String },

    /// Event stream line could not be decoded
    #[error("Malformed event at line {line}: {message}")]
    MalformedEvent { line: usize, message: String },

    /// Event stream could not be read
    #[error("Event source error: {0}")]
    Source(String),
}

impl MatchingError {
    pub(crate) fn invalid(id: &str, reason: impl Into<String>) -> Self {
        Self::InvalidOrder {
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}
