//! Test fixtures and factory functions for creating test data.

use chrono::{DateTime, Utc};

/// Generate a deck file with a specified number of flashcards.
///
/// # Arguments
/// * `title` - Display name on the first line
/// * `num_cards` - Number of flashcards to generate
pub fn sample_md_content(title: &str, num_cards: usize) -> String {
    let cards = (0..num_cards)
        .map(|i| format!("## Term {}\nDefinition {}.\n", i + 1, i + 1))
        .collect::<String>();
    format!("# {}\nGenerated deck\n{}", title, cards)
}

/// A fixed instant offset by `secs`, so timestamps in assertions are stable.
pub fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000 + secs, 0).expect("valid timestamp")
}
