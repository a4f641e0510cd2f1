//! Error types for markdeck-core.
//!
//! Parsing never produces an error: malformed markdown degrades to a partial
//! or empty deck. Everything here comes from deck edits and quiz sessions.

use thiserror::Error;

/// Result type alias using FlashcardError.
pub type Result<T> = std::result::Result<T, FlashcardError>;

/// Errors surfaced by deck edits and quiz sessions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlashcardError {
    #[error("cannot start quiz: fewer than 2 flashcards (found {found})")]
    NotEnoughFlashcards { found: usize },

    #[error("quiz session is already complete")]
    SessionComplete,

    #[error("quiz session is still in progress")]
    SessionInProgress,

    #[error("question {index} has already been answered")]
    AlreadyAnswered { index: usize },

    #[error("question {index} has not been answered yet")]
    NotAnswered { index: usize },

    #[error("flashcard index {index} out of range (deck has {len})")]
    CardIndexOutOfRange { index: usize, len: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_enough_flashcards_message() {
        let err = FlashcardError::NotEnoughFlashcards { found: 1 };
        assert_eq!(
            err.to_string(),
            "cannot start quiz: fewer than 2 flashcards (found 1)"
        );
    }

    #[test]
    fn index_out_of_range_message() {
        let err = FlashcardError::CardIndexOutOfRange { index: 4, len: 2 };
        assert_eq!(err.to_string(), "flashcard index 4 out of range (deck has 2)");
    }
}
