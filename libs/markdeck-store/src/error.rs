//! Storage error types.

use markdeck_core::FlashcardError;
use thiserror::Error;

/// Result type alias using StoreError.
pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Flashcard(#[from] FlashcardError),

    #[error("deck not found: {0}")]
    DeckNotFound(String),

    #[error("quiz session is not over the current version of deck {0}")]
    StaleSession(String),
}
