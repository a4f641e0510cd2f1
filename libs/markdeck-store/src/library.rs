//! Deck library: every uploaded deck with its quiz history.
//!
//! The whole library lives under one storage key as a JSON object keyed by
//! deck name. Reads are served from memory; every change is handed to the
//! [`SaveQueue`] and written later.

use crate::error::{Result, StoreError};
use crate::kv::KeyValueStore;
use crate::queue::{Flusher, SaveQueue};
use chrono::{DateTime, Utc};
use markdeck_core::{
    export_file_name, parse_with, serialize, Completion, Deck, DeckSettings, EffectiveSettings,
    GlobalSettings, QuizSession, QuizStats,
};
use rand::Rng;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Storage key holding all decks.
pub const DECKS_KEY: &str = "markdeck.decks";

/// Storage key holding global and per-deck settings.
pub const SETTINGS_KEY: &str = "markdeck.settings";

/// Name used for imported files without a usable stem.
const UNTITLED_DECK: &str = "untitled";

/// Per-deck bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckStats {
    pub quiz_scores: Vec<u32>,
    pub first_uploaded: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

impl DeckStats {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            quiz_scores: Vec::new(),
            first_uploaded: now,
            last_modified: now,
        }
    }
}

/// A deck as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDeck {
    #[serde(flatten)]
    pub deck: Deck,
    pub stats: DeckStats,
}

/// Settings record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredSettings {
    #[serde(default)]
    pub global: GlobalSettings,
    #[serde(default)]
    pub decks: BTreeMap<String, DeckSettings>,
}

pub struct DeckLibrary<S: KeyValueStore + ?Sized> {
    store: Arc<S>,
    queue: Arc<SaveQueue>,
    decks: BTreeMap<String, StoredDeck>,
    settings: StoredSettings,
}

impl<S: KeyValueStore + ?Sized> DeckLibrary<S> {
    /// Load decks and settings. Missing records start empty.
    ///
    /// The save debounce is read from the global settings here; a changed
    /// value applies from the next load.
    pub fn load(store: Arc<S>) -> Result<Self> {
        let settings: StoredSettings =
            read_json(store.as_ref(), SETTINGS_KEY)?.unwrap_or_default();
        let decks: BTreeMap<String, StoredDeck> =
            read_json(store.as_ref(), DECKS_KEY)?.unwrap_or_default();
        let queue = Arc::new(SaveQueue::from_millis(settings.global.save_debounce_ms));

        tracing::debug!(decks = decks.len(), "loaded deck library");
        Ok(Self {
            store,
            queue,
            decks,
            settings,
        })
    }

    pub fn queue(&self) -> &Arc<SaveQueue> {
        &self.queue
    }

    pub fn len(&self) -> usize {
        self.decks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decks.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.decks.contains_key(name)
    }

    /// Deck names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.decks.keys().map(String::as_str).collect()
    }

    pub fn list(&self) -> impl Iterator<Item = (&str, &StoredDeck)> {
        self.decks.iter().map(|(name, deck)| (name.as_str(), deck))
    }

    pub fn get(&self, name: &str) -> Result<&StoredDeck> {
        self.decks
            .get(name)
            .ok_or_else(|| StoreError::DeckNotFound(name.to_string()))
    }

    /// Parse `content` and store it under `name`.
    ///
    /// An existing deck of that name is replaced wholesale; its quiz history
    /// and first upload time are kept.
    pub fn upload(
        &mut self,
        name: &str,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<&StoredDeck> {
        let settings = self.effective_settings(name);
        let deck = parse_with(content, &settings.parser());
        tracing::info!("Uploaded deck {}: {} flashcards", name, deck.len());
        self.replace(name, deck, now)
    }

    /// Read a markdown file and upload it under its file stem.
    pub fn import_file<P: AsRef<Path>>(&mut self, path: P, now: DateTime<Utc>) -> Result<String> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or(UNTITLED_DECK)
            .to_string();

        self.upload(&name, &content, now)?;
        Ok(name)
    }

    /// Replace an existing deck with an edited version.
    pub fn save_edit(
        &mut self,
        name: &str,
        deck: Deck,
        now: DateTime<Utc>,
    ) -> Result<&StoredDeck> {
        self.get(name)?;
        tracing::info!("Saved edits to deck {}", name);
        self.replace(name, deck.normalized(), now)
    }

    fn replace(&mut self, name: &str, deck: Deck, now: DateTime<Utc>) -> Result<&StoredDeck> {
        let stats = match self.decks.remove(name) {
            Some(previous) => DeckStats {
                last_modified: now,
                ..previous.stats
            },
            None => DeckStats::new(now),
        };
        self.decks
            .insert(name.to_string(), StoredDeck { deck, stats });
        self.persist_decks(now)?;
        self.get(name)
    }

    /// Remove a deck along with its settings override.
    pub fn delete(&mut self, name: &str, now: DateTime<Utc>) -> Result<StoredDeck> {
        let removed = self
            .decks
            .remove(name)
            .ok_or_else(|| StoreError::DeckNotFound(name.to_string()))?;
        if self.settings.decks.remove(name).is_some() {
            self.persist_settings(now)?;
        }
        self.persist_decks(now)?;
        tracing::info!("Deleted deck {}", name);
        Ok(removed)
    }

    /// Download name and markdown text for a deck.
    pub fn export(&self, name: &str) -> Result<(String, String)> {
        let stored = self.get(name)?;
        Ok((
            export_file_name(&stored.deck.display_name),
            serialize(&stored.deck),
        ))
    }

    /// Start a quiz over the stored deck, seeded with its score history.
    pub fn start_quiz<R: Rng + ?Sized>(&self, name: &str, rng: &mut R) -> Result<QuizSession> {
        let stored = self.get(name)?;
        let settings = self.effective_settings(name).quiz();
        let session = QuizSession::start(
            Arc::new(stored.deck.clone()),
            stored.stats.quiz_scores.clone(),
            &settings,
            rng,
        )?;
        Ok(session)
    }

    /// Record the score of a completed session.
    ///
    /// The session is consumed, so each one is recorded at most once. A
    /// session over a deck that has since been re-uploaded or edited is
    /// rejected with [`StoreError::StaleSession`].
    pub fn finish_quiz(
        &mut self,
        name: &str,
        session: QuizSession,
        now: DateTime<Utc>,
    ) -> Result<Completion> {
        let completion = session.complete()?;
        if **session.deck() != self.get(name)?.deck {
            return Err(StoreError::StaleSession(name.to_string()));
        }
        self.record_quiz_score(name, completion.final_score, now)?;
        Ok(Completion {
            history: self.get(name)?.stats.quiz_scores.clone(),
            ..completion
        })
    }

    /// Append a final score to a deck's history.
    pub fn record_quiz_score(&mut self, name: &str, score: u32, now: DateTime<Utc>) -> Result<()> {
        let stored = self
            .decks
            .get_mut(name)
            .ok_or_else(|| StoreError::DeckNotFound(name.to_string()))?;
        stored.stats.quiz_scores.push(score);
        tracing::info!(
            "Recorded quiz score {}/{} for deck {}",
            score,
            stored.deck.len(),
            name
        );
        self.persist_decks(now)
    }

    pub fn stats(&self, name: &str) -> Result<QuizStats> {
        let stored = self.get(name)?;
        Ok(QuizStats::from_history(
            &stored.stats.quiz_scores,
            stored.deck.len(),
        ))
    }

    pub fn global_settings(&self) -> &GlobalSettings {
        &self.settings.global
    }

    pub fn save_global_settings(
        &mut self,
        settings: GlobalSettings,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.settings.global = settings;
        self.persist_settings(now)
    }

    pub fn deck_settings(&self, name: &str) -> Option<&DeckSettings> {
        self.settings.decks.get(name)
    }

    pub fn save_deck_settings(&mut self, settings: DeckSettings, now: DateTime<Utc>) -> Result<()> {
        self.settings
            .decks
            .insert(settings.deck_name.clone(), settings);
        self.persist_settings(now)
    }

    /// Drop a deck's overrides (revert to global).
    pub fn delete_deck_settings(&mut self, name: &str, now: DateTime<Utc>) -> Result<()> {
        if self.settings.decks.remove(name).is_some() {
            self.persist_settings(now)?;
        }
        Ok(())
    }

    pub fn effective_settings(&self, name: &str) -> EffectiveSettings {
        EffectiveSettings::merge(&self.settings.global, self.settings.decks.get(name))
    }

    /// Write pending changes whose debounce has elapsed.
    pub fn flush(&self, now: DateTime<Utc>) -> Result<usize> {
        self.queue.flush_due(self.store.as_ref(), now)
    }

    /// Write all pending changes immediately.
    pub fn flush_all(&self) -> Result<usize> {
        self.queue.flush_all(self.store.as_ref())
    }

    /// Run a background flusher for this library on the current tokio runtime.
    pub fn spawn_flusher(&self, period: std::time::Duration) -> Flusher
    where
        S: 'static,
    {
        Flusher::spawn(Arc::clone(&self.queue), Arc::clone(&self.store), period)
    }

    fn persist_decks(&self, now: DateTime<Utc>) -> Result<()> {
        let json = serde_json::to_string(&self.decks)?;
        self.queue.request_save(DECKS_KEY, json, now);
        Ok(())
    }

    fn persist_settings(&self, now: DateTime<Utc>) -> Result<()> {
        let json = serde_json::to_string(&self.settings)?;
        self.queue.request_save(SETTINGS_KEY, json, now);
        Ok(())
    }
}

fn read_json<S, T>(store: &S, key: &str) -> Result<Option<T>>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    match store.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}
