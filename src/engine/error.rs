//! Generation collaborator error types.
//!
//! Collaborator failures are never retried; they abort the run.

use thiserror::Error;

/// Errors raised by an engine or model collaborator.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Invalid sampling parameters: {0}")]
    InvalidParams(String),

    #[error("Empty input batch")]
    EmptyBatch,

    #[error("Ragged input batch: row {row} has {got} tokens, expected {expected}")]
    RaggedBatch { row: usize, got: usize, expected: usize },

    #[error("Request of {tokens} tokens exceeds engine token budget {budget}")]
    RequestTooLarge { tokens: usize, budget: usize },

    #[error("Model error: {0}")]
    ModelError(String),
}
