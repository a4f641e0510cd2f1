//! Statistics over a deck's quiz history.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of the last two quiz results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
    #[serde(rename = "n/a")]
    NotAvailable,
}

impl Trend {
    /// Compare the last two entries of `history`.
    pub fn from_history(history: &[u32]) -> Self {
        match history {
            [.., previous, last] if last > previous => Self::Improving,
            [.., previous, last] if last < previous => Self::Declining,
            [.., _, _] => Self::Stable,
            _ => Self::NotAvailable,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Improving => "Improving",
            Self::Declining => "Declining",
            Self::Stable => "Stable",
            Self::NotAvailable => "N/A",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived quiz statistics for one deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizStats {
    pub attempts: usize,
    pub highest_percentage: Option<f64>,
    pub lowest_percentage: Option<f64>,
    pub average_percentage: Option<f64>,
    pub latest_percentage: Option<f64>,
    pub total_correct: u64,
    pub total_possible: u64,
    pub trend: Trend,
}

impl QuizStats {
    /// Compute statistics from final session scores, each out of `total`
    /// questions.
    pub fn from_history(history: &[u32], total: usize) -> Self {
        let percentages: Vec<f64> = history
            .iter()
            .map(|&score| percentage(score, total))
            .collect();

        let average_percentage = if percentages.is_empty() {
            None
        } else {
            Some(percentages.iter().sum::<f64>() / percentages.len() as f64)
        };

        Self {
            attempts: history.len(),
            highest_percentage: percentages.iter().copied().reduce(f64::max),
            lowest_percentage: percentages.iter().copied().reduce(f64::min),
            average_percentage,
            latest_percentage: percentages.last().copied(),
            total_correct: history.iter().map(|&score| u64::from(score)).sum(),
            total_possible: (history.len() * total) as u64,
            trend: Trend::from_history(history),
        }
    }
}

/// `score / total * 100`, or 0 for an empty deck.
pub fn percentage(score: u32, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    f64::from(score) / total as f64 * 100.0
}

/// Render a percentage with two decimals, e.g. `80.00%`.
pub fn format_percentage(value: f64) -> String {
    format!("{value:.2}%")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn three_sessions_improving() {
        let stats = QuizStats::from_history(&[3, 4, 5], 5);
        assert_eq!(stats.attempts, 3);
        assert_eq!(stats.average_percentage.map(format_percentage), Some("80.00%".to_string()));
        assert_eq!(stats.highest_percentage, Some(100.0));
        assert_eq!(stats.lowest_percentage, Some(60.0));
        assert_eq!(stats.latest_percentage, Some(100.0));
        assert_eq!(stats.total_correct, 12);
        assert_eq!(stats.total_possible, 15);
        assert_eq!(stats.trend, Trend::Improving);
        assert_eq!(stats.trend.to_string(), "Improving");
    }

    #[test]
    fn empty_history() {
        let stats = QuizStats::from_history(&[], 5);
        assert_eq!(stats.attempts, 0);
        assert_eq!(stats.average_percentage, None);
        assert_eq!(stats.highest_percentage, None);
        assert_eq!(stats.total_possible, 0);
        assert_eq!(stats.trend, Trend::NotAvailable);
        assert_eq!(stats.trend.to_string(), "N/A");
    }

    #[test]
    fn trend_uses_last_two_entries() {
        assert_eq!(Trend::from_history(&[5]), Trend::NotAvailable);
        assert_eq!(Trend::from_history(&[1, 5, 2]), Trend::Declining);
        assert_eq!(Trend::from_history(&[9, 3, 3]), Trend::Stable);
        assert_eq!(Trend::from_history(&[4, 2, 3]), Trend::Improving);
    }

    #[test]
    fn zero_total_does_not_divide() {
        let stats = QuizStats::from_history(&[0, 0], 0);
        assert_eq!(stats.average_percentage, Some(0.0));
        assert_eq!(percentage(3, 0), 0.0);
    }

    #[test]
    fn format_two_decimals() {
        assert_eq!(format_percentage(200.0 / 3.0), "66.67%");
    }
}
