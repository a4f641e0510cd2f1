//! Multiple-choice quiz sessions over a deck.
//!
//! Each question shows a definition and asks for its term. The options are
//! the correct term plus distractors sampled uniformly without replacement
//! from the other flashcards, in a uniformly random order.
//!
//! Sessions are values: every transition borrows the current session and
//! returns the next one, so a caller can keep, compare or drop snapshots.
//!
//! ```text
//! InProgress --submit_answer/skip--> InProgress (answered)
//!            --advance-->            InProgress (next question) | Complete
//! ```

use crate::error::{FlashcardError, Result};
use crate::types::{Deck, QuizSettings};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Session status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Complete,
}

/// A generated multiple-choice question.
///
/// Only [`Question::generate`] builds one, so `correct_index` always points
/// into `options`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    index: usize,
    prompt: String,
    options: Vec<String>,
    correct_index: usize,
}

impl Question {
    /// Build the question for `deck.flashcards[index]`.
    pub fn generate<R: Rng + ?Sized>(
        deck: &Deck,
        index: usize,
        settings: &QuizSettings,
        rng: &mut R,
    ) -> Result<Self> {
        if !deck.is_quizzable() {
            return Err(FlashcardError::NotEnoughFlashcards { found: deck.len() });
        }
        let card = deck
            .flashcards
            .get(index)
            .ok_or(FlashcardError::CardIndexOutOfRange {
                index,
                len: deck.len(),
            })?;

        // Repeated terms would show up as identical options.
        let mut seen = HashSet::new();
        seen.insert(card.term.as_str());
        let candidates: Vec<&str> = deck
            .flashcards
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, other)| other.term.as_str())
            .filter(|term| seen.insert(*term))
            .collect();

        let mut options: Vec<String> = candidates
            .choose_multiple(rng, settings.distractor_count())
            .map(|term| (*term).to_string())
            .collect();
        options.shuffle(rng);

        let correct_index = rng.gen_range(0..=options.len());
        options.insert(correct_index, card.term.clone());

        Ok(Self {
            index,
            prompt: card.definition.clone(),
            options,
            correct_index,
        })
    }

    /// Index of the flashcard being asked.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The flashcard's definition.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Terms in display order.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Position of the correct term in [`Question::options`].
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    pub fn correct_term(&self) -> &str {
        self.options
            .get(self.correct_index)
            .map_or("", String::as_str)
    }
}

/// One answered (or skipped) question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    pub question_index: usize,
    pub correct_term: String,
    /// `None` when the question was skipped.
    pub selected_term: Option<String>,
    pub is_correct: bool,
}

/// Result of a finished session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub final_score: u32,
    pub total: usize,
    /// Score history including this session.
    pub history: Vec<u32>,
}

/// One quiz run over a deck.
#[derive(Debug, Clone)]
pub struct QuizSession {
    deck: Arc<Deck>,
    settings: QuizSettings,
    current_index: usize,
    score: u32,
    history: Vec<u32>,
    status: SessionStatus,
    question: Option<Question>,
    attempts: Vec<Attempt>,
}

impl QuizSession {
    /// Start a session at the first flashcard. `history` holds the final
    /// scores of earlier sessions over this deck.
    pub fn start<R: Rng + ?Sized>(
        deck: Arc<Deck>,
        history: Vec<u32>,
        settings: &QuizSettings,
        rng: &mut R,
    ) -> Result<Self> {
        let question = Question::generate(&deck, 0, settings, rng)?;
        Ok(Self {
            deck,
            settings: *settings,
            current_index: 0,
            score: 0,
            history,
            status: SessionStatus::InProgress,
            question: Some(question),
            attempts: Vec::new(),
        })
    }

    pub fn deck(&self) -> &Arc<Deck> {
        &self.deck
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn total(&self) -> usize {
        self.deck.len()
    }

    pub fn history(&self) -> &[u32] {
        &self.history
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }

    pub fn incorrect_count(&self) -> usize {
        self.attempts.iter().filter(|a| !a.is_correct).count()
    }

    /// The attempt made on the current question, if any.
    pub fn current_attempt(&self) -> Option<&Attempt> {
        self.attempts
            .last()
            .filter(|attempt| attempt.question_index == self.current_index)
    }

    /// The question currently on screen.
    pub fn next_question(&self) -> Result<&Question> {
        match (&self.status, &self.question) {
            (SessionStatus::InProgress, Some(question)) => Ok(question),
            _ => Err(FlashcardError::SessionComplete),
        }
    }

    /// Answer the current question with `selected`, compared to the correct
    /// term by exact string equality.
    pub fn submit_answer(&self, selected: &str) -> Result<(bool, Self)> {
        self.record(Some(selected))
    }

    /// "Don't know": counts as an incorrect attempt.
    pub fn skip(&self) -> Result<Self> {
        self.record(None).map(|(_, next)| next)
    }

    fn record(&self, selected: Option<&str>) -> Result<(bool, Self)> {
        self.next_question()?;
        if self.current_attempt().is_some() {
            return Err(FlashcardError::AlreadyAnswered {
                index: self.current_index,
            });
        }

        let correct_term = &self.deck.flashcards[self.current_index].term;
        let is_correct = selected == Some(correct_term.as_str());

        let mut next = self.clone();
        if is_correct {
            next.score += 1;
        }
        next.attempts.push(Attempt {
            question_index: self.current_index,
            correct_term: correct_term.clone(),
            selected_term: selected.map(str::to_string),
            is_correct,
        });
        Ok((is_correct, next))
    }

    /// Move past an answered question. After the last question the session
    /// becomes complete and its score is appended to the history.
    pub fn advance<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Self> {
        self.next_question()?;
        if self.current_attempt().is_none() {
            return Err(FlashcardError::NotAnswered {
                index: self.current_index,
            });
        }

        let mut next = self.clone();
        let index = self.current_index + 1;
        if index < self.deck.len() {
            next.question = Some(Question::generate(
                &self.deck,
                index,
                &self.settings,
                rng,
            )?);
            next.current_index = index;
        } else {
            next.question = None;
            next.current_index = self.deck.len();
            next.status = SessionStatus::Complete;
            next.history.push(self.score);
        }
        Ok(next)
    }

    /// Final score and updated history of a completed session.
    pub fn complete(&self) -> Result<Completion> {
        if self.status != SessionStatus::Complete {
            return Err(FlashcardError::SessionInProgress);
        }
        Ok(Completion {
            final_score: self.score,
            total: self.deck.len(),
            history: self.history.clone(),
        })
    }

    /// A fresh session over the same deck. History is carried over as is.
    pub fn restart<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Self> {
        Self::start(
            Arc::clone(&self.deck),
            self.history.clone(),
            &self.settings,
            rng,
        )
    }
}
