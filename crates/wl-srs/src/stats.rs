use serde::{Deserialize, Serialize};

/// Aggregate study statistics for one learner on one deck.
///
/// Always derived from the current records; nothing here is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckStats {
    /// Number of words in the deck, as reported by the word catalog
    pub total_words: i64,
    /// Number of words with at least one attempt
    pub studied_words: i64,
    /// Number of words whose streak reached the mastery threshold
    pub mastered_words: i64,
    /// Number of words attempted inside the rolling "today" window
    pub today_studied: i64,
    /// Percentage of correct attempts, one decimal place
    pub accuracy: f64,
    /// Mean seconds per attempt
    pub average_time_spent: f64,
}

/// Round a ratio to a percentage with one decimal place.
pub(crate) fn percentage_one_decimal(part: i64, whole: i64) -> f64 {
    if whole <= 0 {
        return 0.0;
    }
    (part as f64 / whole as f64 * 1000.0).round() / 10.0
}
