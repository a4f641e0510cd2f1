//! Core flashcard library for markdown decks.
//!
//! Provides:
//! - Markdown parser and serializer for deck files
//! - Deck editing operations
//! - Multiple-choice quiz sessions with uniform distractor sampling
//! - Quiz history statistics
//! - Shared types and settings (Deck, Flashcard, GlobalSettings, etc.)

pub mod error;
pub mod parser;
pub mod quiz;
pub mod serializer;
pub mod stats;
pub mod types;

pub use error::{FlashcardError, Result};
pub use parser::{parse, parse_with};
pub use quiz::{Attempt, Completion, Question, QuizSession, SessionStatus};
pub use serializer::{export_file_name, serialize};
pub use stats::{format_percentage, percentage, QuizStats, Trend};
pub use types::{
    BlankLines, CardField, Deck, DeckSettings, DefinitionJoin, EffectiveSettings, Flashcard,
    GlobalSettings, ParserSettings, QuizSettings,
};
