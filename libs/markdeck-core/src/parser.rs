//! Markdown parser for flashcard files.
//!
//! # Format
//! ```markdown
//! # Biology
//! Chapter 3 study guide
//! ## Cell
//! Basic unit of life
//! ## DNA
//! Genetic material.
//! Multiple lines are supported.
//! ```
//!
//! The first line is the display name (a leading `# ` is stripped), the second
//! line is the description, and every `## ` heading after that starts a
//! flashcard whose definition is the text up to the next heading.
//!
//! Parsing never fails. Files are user-authored, so malformed input degrades
//! to a partial or empty deck: a heading without text under it is dropped,
//! text with no heading above it is ignored, and empty input yields an empty
//! deck.

use crate::types::{BlankLines, Deck, Flashcard, ParserSettings};

/// Parse markdown content into a deck using the default settings.
pub fn parse(content: &str) -> Deck {
    parse_with(content, &ParserSettings::default())
}

/// Parse markdown content into a deck.
pub fn parse_with(content: &str, settings: &ParserSettings) -> Deck {
    let mut lines = content.lines();

    let display_name = lines.next().map(title_text).unwrap_or_default();
    let description = lines
        .next()
        .map(|line| line.trim().to_string())
        .unwrap_or_default();

    let mut parser = Parser::new(*settings);
    for line in lines {
        parser.process_line(line);
    }

    Deck {
        display_name,
        description,
        flashcards: parser.finish(),
    }
}

fn title_text(line: &str) -> String {
    line.strip_prefix("# ").unwrap_or(line).trim().to_string()
}

enum LineType<'a> {
    Heading(&'a str),
    Text(&'a str),
    Blank,
}

impl<'a> LineType<'a> {
    fn of(line: &'a str) -> Self {
        if let Some(rest) = line.strip_prefix("## ") {
            LineType::Heading(rest.trim())
        } else if line.trim().is_empty() {
            LineType::Blank
        } else {
            LineType::Text(line.trim())
        }
    }
}

struct Parser {
    settings: ParserSettings,
    cards: Vec<Flashcard>,
    term: Option<String>,
    paragraphs: Vec<Vec<String>>,
    break_pending: bool,
}

impl Parser {
    fn new(settings: ParserSettings) -> Self {
        Self {
            settings,
            cards: Vec::new(),
            term: None,
            paragraphs: Vec::new(),
            break_pending: false,
        }
    }

    fn process_line(&mut self, line: &str) {
        match LineType::of(line) {
            LineType::Heading(term) => {
                self.flush();
                self.term = Some(term.to_string());
            }
            LineType::Text(text) => self.push_text(text),
            LineType::Blank => self.handle_blank(),
        }
    }

    fn push_text(&mut self, text: &str) {
        // Text above the first heading has no term to belong to.
        if self.term.is_none() {
            return;
        }

        if self.break_pending || self.paragraphs.is_empty() {
            self.paragraphs.push(Vec::new());
            self.break_pending = false;
        }
        if let Some(paragraph) = self.paragraphs.last_mut() {
            paragraph.push(text.to_string());
        }
    }

    fn handle_blank(&mut self) {
        match self.settings.blank_lines {
            BlankLines::Skip => {}
            BlankLines::ParagraphBreak => {
                if !self.paragraphs.is_empty() {
                    self.break_pending = true;
                }
            }
        }
    }

    fn flush(&mut self) {
        let paragraphs = std::mem::take(&mut self.paragraphs);
        self.break_pending = false;

        let Some(term) = self.term.take() else {
            return;
        };

        let separator = self.settings.definition_join.separator();
        let definition = paragraphs
            .iter()
            .map(|paragraph| paragraph.join(separator))
            .collect::<Vec<_>>()
            .join("\n\n");
        let definition = definition.trim();

        if !term.is_empty() && !definition.is_empty() {
            self.cards.push(Flashcard::new(term, definition));
        }
    }

    fn finish(mut self) -> Vec<Flashcard> {
        self.flush();
        self.cards
    }
}
