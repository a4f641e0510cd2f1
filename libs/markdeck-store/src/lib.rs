//! Persistence for markdeck decks.
//!
//! Provides:
//! - A key-value storage interface with in-memory and SQLite implementations
//! - Debounced, fire-and-forget saves with an optional background flusher
//! - The deck library: uploads, edits, exports, quiz history and settings

pub mod error;
pub mod kv;
pub mod library;
pub mod queue;
pub mod schema;
pub mod sqlite;

pub use error::{Result, StoreError};
pub use kv::{KeyValueStore, MemoryStore};
pub use library::{DeckLibrary, DeckStats, StoredDeck, StoredSettings, DECKS_KEY, SETTINGS_KEY};
pub use queue::{Flusher, SaveQueue};
pub use sqlite::SqliteStore;
