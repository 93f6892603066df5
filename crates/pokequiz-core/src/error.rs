//! Error types shared across pokequiz.
//!
//! `QuizError` covers input the player must correct. `StoreError` is raised
//! by `DurableStore` backends and by the score store's timeout wrapper.

use thiserror::Error;

/// Validation errors surfaced to the player for correction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    /// The player name is empty after trimming.
    #[error("player name must not be empty")]
    EmptyPlayerName,

    /// The guess is empty after trimming.
    #[error("guess must not be empty")]
    EmptyGuess,

    /// Every question of the round has already been answered.
    #[error("the round is already complete")]
    RoundComplete,
}

/// Errors raised by a persistence backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend cannot be used in this environment.
    #[error("backend '{0}' is unavailable")]
    Unavailable(String),

    /// The backend did not answer in time.
    #[error("backend '{backend}' timed out after {timeout_ms}ms")]
    Timeout { backend: String, timeout_ms: u64 },

    /// The stored document could not be decoded.
    #[error("corrupt document in '{backend}': {message}")]
    Corrupt { backend: String, message: String },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
