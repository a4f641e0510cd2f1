//! Deck to markdown export.
//!
//! The output is the format read by [`crate::parser::parse`]:
//!
//! ```markdown
//! # {display_name}
//! {description}
//! ## {term}
//! {definition}
//! ```

use crate::types::Deck;

/// File name used when a deck has no usable display name.
const FALLBACK_FILE_NAME: &str = "flashcards.md";

/// Serialize a deck back to markdown.
pub fn serialize(deck: &Deck) -> String {
    let mut out = String::new();
    out.push_str("# ");
    out.push_str(&single_line(&deck.display_name));
    out.push('\n');
    out.push_str(&single_line(&deck.description));
    out.push('\n');

    for card in &deck.flashcards {
        out.push_str("## ");
        out.push_str(&card.term);
        out.push('\n');
        out.push_str(&card.definition);
        out.push('\n');
    }

    out
}

/// Download name for an exported deck: whitespace runs become `_`, the
/// result is lowercased and gets an `.md` extension.
pub fn export_file_name(display_name: &str) -> String {
    let stem = display_name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase();

    if stem.is_empty() {
        FALLBACK_FILE_NAME.to_string()
    } else {
        format!("{stem}.md")
    }
}

// The header occupies exactly two lines, so embedded breaks are folded.
fn single_line(s: &str) -> String {
    s.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::types::Flashcard;
    use pretty_assertions::assert_eq;

    fn bio_deck() -> Deck {
        Deck::new(
            "Bio",
            "Study guide",
            vec![
                Flashcard::new("Cell", "Basic unit of life"),
                Flashcard::new("DNA", "Genetic material\nFound in the nucleus"),
            ],
        )
    }

    #[test]
    fn serialize_layout() {
        let text = serialize(&bio_deck());
        assert_eq!(
            text,
            concat!(
                "# Bio\nStudy guide\n",
                "## Cell\nBasic unit of life\n",
                "## DNA\nGenetic material\nFound in the nucleus\n",
            )
        );
    }

    #[test]
    fn parse_restores_serialized_deck() {
        let deck = bio_deck();
        assert_eq!(parse(&serialize(&deck)), deck);
    }

    #[test]
    fn parse_restores_single_card_deck() {
        let deck = Deck::new("Chem", "Atoms", vec![Flashcard::new("H", "Hydrogen")]);
        assert_eq!(parse(&serialize(&deck)), deck);
    }

    #[test]
    fn parse_restores_edge_decks() {
        let cases = vec![
            (
                "several definition lines",
                Deck::new(
                    "Bio",
                    "Study guide",
                    vec![
                        Flashcard::new("Mitosis", "Prophase\nMetaphase\nAnaphase\nTelophase"),
                        Flashcard::new("Meiosis", "Two divisions\nFour cells"),
                    ],
                ),
            ),
            (
                "title with its own marker",
                Deck::new("# Heading", "desc", vec![Flashcard::new("A", "a")]),
            ),
            (
                "empty description",
                Deck::new("Bio", "", vec![Flashcard::new("Cell", "Unit")]),
            ),
            (
                "empty header",
                Deck::new("", "", vec![Flashcard::new("Cell", "Unit")]),
            ),
            (
                "surrounding whitespace",
                Deck::new(
                    "  Padded  ",
                    " spaced out ",
                    vec![
                        Flashcard::new("  Term  ", "  padded definition  "),
                        Flashcard::new("Other", "\tfirst\nsecond  "),
                    ],
                ),
            ),
        ];

        for (label, deck) in cases {
            let expected = deck.clone().normalized();
            assert_eq!(parse(&serialize(&deck)), expected, "{label}");
        }
    }

    #[test]
    fn multiline_header_is_folded() {
        let deck = Deck::new("Big\nTitle", "line one\n\nline two", Vec::new());
        let text = serialize(&deck);
        assert_eq!(text, "# Big Title\nline one line two\n");

        let parsed = parse(&text);
        assert_eq!(parsed.display_name, "Big Title");
        assert_eq!(parsed.description, "line one line two");
    }

    #[test]
    fn file_name_from_title() {
        assert_eq!(export_file_name("Cell Biology  Basics"), "cell_biology_basics.md");
        assert_eq!(export_file_name("  "), "flashcards.md");
    }
}
