//! Core types for markdeck.

use crate::error::{FlashcardError, Result};
use serde::{Deserialize, Serialize};

/// A single term/definition pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub term: String,
    pub definition: String,
}

impl Flashcard {
    pub fn new(term: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            definition: definition.into(),
        }
    }
}

/// Which half of a flashcard an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardField {
    Term,
    Definition,
}

/// Parsed deck: metadata plus flashcards in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub display_name: String,
    pub description: String,
    pub flashcards: Vec<Flashcard>,
}

impl Deck {
    pub fn new(
        display_name: impl Into<String>,
        description: impl Into<String>,
        flashcards: Vec<Flashcard>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            description: description.into(),
            flashcards,
        }
    }

    pub fn len(&self) -> usize {
        self.flashcards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flashcards.is_empty()
    }

    /// A quiz needs at least one distractor per question.
    pub fn is_quizzable(&self) -> bool {
        self.flashcards.len() >= 2
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append a flashcard. Empty entries are allowed while editing and are
    /// dropped by [`Deck::normalized`].
    pub fn with_flashcard_added(
        mut self,
        term: impl Into<String>,
        definition: impl Into<String>,
    ) -> Self {
        self.flashcards.push(Flashcard::new(term, definition));
        self
    }

    pub fn with_flashcard_updated(
        mut self,
        index: usize,
        field: CardField,
        value: impl Into<String>,
    ) -> Result<Self> {
        let len = self.flashcards.len();
        let card = self
            .flashcards
            .get_mut(index)
            .ok_or(FlashcardError::CardIndexOutOfRange { index, len })?;
        match field {
            CardField::Term => card.term = value.into(),
            CardField::Definition => card.definition = value.into(),
        }
        Ok(self)
    }

    pub fn with_flashcard_removed(mut self, index: usize) -> Result<Self> {
        let len = self.flashcards.len();
        if index >= len {
            return Err(FlashcardError::CardIndexOutOfRange { index, len });
        }
        self.flashcards.remove(index);
        Ok(self)
    }

    /// Trim every field and drop flashcards missing a term or a definition.
    ///
    /// This is the shape a deck has after a save, matching what the parser
    /// would produce from the exported markdown.
    pub fn normalized(self) -> Self {
        let flashcards = self
            .flashcards
            .into_iter()
            .map(|card| Flashcard::new(card.term.trim(), card.definition.trim()))
            .filter(|card| !card.term.is_empty() && !card.definition.is_empty())
            .collect();

        Self {
            display_name: self.display_name.trim().to_string(),
            description: self.description.trim().to_string(),
            flashcards,
        }
    }
}

/// What the parser does with blank lines inside a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlankLines {
    /// Ignore blank lines entirely.
    Skip,
    /// A run of blank lines separates paragraphs with one empty line.
    ParagraphBreak,
}

impl Default for BlankLines {
    fn default() -> Self {
        Self::Skip
    }
}

/// Separator placed between the lines of one definition paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefinitionJoin {
    Newline,
    Space,
}

impl Default for DefinitionJoin {
    fn default() -> Self {
        Self::Newline
    }
}

impl DefinitionJoin {
    pub fn separator(self) -> &'static str {
        match self {
            Self::Newline => "\n",
            Self::Space => " ",
        }
    }
}

/// Parser configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserSettings {
    pub blank_lines: BlankLines,
    pub definition_join: DefinitionJoin,
}

/// Default number of options per question (correct term plus 3 distractors).
pub const DEFAULT_OPTION_COUNT: usize = 4;

/// Quiz configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSettings {
    /// Upper bound on options per question, including the correct term.
    pub option_count: usize,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            option_count: DEFAULT_OPTION_COUNT,
        }
    }
}

impl QuizSettings {
    /// Distractors drawn per question; at least one.
    pub fn distractor_count(&self) -> usize {
        self.option_count.max(2) - 1
    }
}

/// Global settings configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalSettings {
    pub blank_lines: BlankLines,
    pub definition_join: DefinitionJoin,
    pub option_count: usize,
    pub save_debounce_ms: u64,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            blank_lines: BlankLines::default(),
            definition_join: DefinitionJoin::default(),
            option_count: DEFAULT_OPTION_COUNT,
            save_debounce_ms: 500,
        }
    }
}

/// Per-deck settings (all fields optional for overrides).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckSettings {
    pub deck_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blank_lines: Option<BlankLines>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition_join: Option<DefinitionJoin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_count: Option<usize>,
}

impl DeckSettings {
    /// Create new deck settings with only the name set.
    pub fn new(deck_name: String) -> Self {
        Self {
            deck_name,
            blank_lines: None,
            definition_join: None,
            option_count: None,
        }
    }
}

/// Effective settings (global merged with deck overrides).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectiveSettings {
    pub blank_lines: BlankLines,
    pub definition_join: DefinitionJoin,
    pub option_count: usize,
    pub save_debounce_ms: u64,
}

impl EffectiveSettings {
    /// Merge global settings with optional deck settings.
    pub fn merge(global: &GlobalSettings, deck: Option<&DeckSettings>) -> Self {
        match deck {
            Some(d) => Self {
                blank_lines: d.blank_lines.unwrap_or(global.blank_lines),
                definition_join: d.definition_join.unwrap_or(global.definition_join),
                option_count: d.option_count.unwrap_or(global.option_count),
                save_debounce_ms: global.save_debounce_ms,
            },
            None => Self {
                blank_lines: global.blank_lines,
                definition_join: global.definition_join,
                option_count: global.option_count,
                save_debounce_ms: global.save_debounce_ms,
            },
        }
    }

    pub fn parser(&self) -> ParserSettings {
        ParserSettings {
            blank_lines: self.blank_lines,
            definition_join: self.definition_join,
        }
    }

    pub fn quiz(&self) -> QuizSettings {
        QuizSettings {
            option_count: self.option_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_deck() -> Deck {
        Deck::new(
            "Bio",
            "Study guide",
            vec![
                Flashcard::new("Cell", "Basic unit of life"),
                Flashcard::new("DNA", "Genetic material"),
            ],
        )
    }

    #[test]
    fn update_term_and_definition() {
        let deck = sample_deck()
            .with_flashcard_updated(0, CardField::Term, "Cells")
            .unwrap()
            .with_flashcard_updated(1, CardField::Definition, "Heredity carrier")
            .unwrap();
        assert_eq!(deck.flashcards[0], Flashcard::new("Cells", "Basic unit of life"));
        assert_eq!(deck.flashcards[1], Flashcard::new("DNA", "Heredity carrier"));
    }

    #[test]
    fn update_out_of_range() {
        let result = sample_deck().with_flashcard_updated(2, CardField::Term, "x");
        assert_eq!(
            result,
            Err(FlashcardError::CardIndexOutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn remove_keeps_order() {
        let deck = sample_deck()
            .with_flashcard_added("RNA", "Messenger")
            .with_flashcard_removed(1)
            .unwrap();
        let terms: Vec<_> = deck.flashcards.iter().map(|c| c.term.as_str()).collect();
        assert_eq!(terms, vec!["Cell", "RNA"]);
    }

    #[test]
    fn remove_out_of_range() {
        assert!(matches!(
            Deck::default().with_flashcard_removed(0),
            Err(FlashcardError::CardIndexOutOfRange { index: 0, len: 0 })
        ));
    }

    #[test]
    fn normalized_drops_incomplete_cards() {
        let deck = sample_deck()
            .with_display_name("  Bio  ")
            .with_flashcard_added("", "")
            .with_flashcard_added("Orphan", "   ")
            .with_flashcard_added(" RNA ", " Messenger ")
            .normalized();
        assert_eq!(deck.display_name, "Bio");
        assert_eq!(deck.len(), 3);
        assert_eq!(deck.flashcards[2], Flashcard::new("RNA", "Messenger"));
    }

    #[test]
    fn quizzable_needs_two_cards() {
        assert!(!Deck::default().is_quizzable());
        assert!(!Deck::default().with_flashcard_added("a", "b").is_quizzable());
        assert!(sample_deck().is_quizzable());
    }

    #[test]
    fn deck_serializes_camel_case() {
        let json = serde_json::to_value(sample_deck()).unwrap();
        assert_eq!(json["displayName"], "Bio");
        assert_eq!(json["flashcards"][1]["term"], "DNA");
    }

    #[test]
    fn merge_without_overrides() {
        let global = GlobalSettings::default();
        let effective = EffectiveSettings::merge(&global, None);
        assert_eq!(effective.option_count, 4);
        assert_eq!(effective.blank_lines, BlankLines::Skip);
        assert_eq!(effective.definition_join, DefinitionJoin::Newline);
    }

    #[test]
    fn merge_with_overrides() {
        let global = GlobalSettings::default();
        let mut deck = DeckSettings::new("bio".to_string());
        deck.blank_lines = Some(BlankLines::ParagraphBreak);
        deck.option_count = Some(3);

        let effective = EffectiveSettings::merge(&global, Some(&deck));
        assert_eq!(effective.blank_lines, BlankLines::ParagraphBreak);
        assert_eq!(effective.definition_join, DefinitionJoin::Newline);
        assert_eq!(effective.quiz().distractor_count(), 2);
        assert_eq!(effective.save_debounce_ms, 500);
    }

    #[test]
    fn distractor_count_has_floor() {
        let settings = QuizSettings { option_count: 0 };
        assert_eq!(settings.distractor_count(), 1);
    }

    #[test]
    fn global_settings_fill_missing_fields() {
        let settings: GlobalSettings =
            serde_json::from_str(r#"{"blank_lines":"paragraph_break"}"#).unwrap();
        assert_eq!(settings.blank_lines, BlankLines::ParagraphBreak);
        assert_eq!(settings.option_count, 4);
        assert_eq!(settings.save_debounce_ms, 500);
    }
}
