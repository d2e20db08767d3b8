use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;
use wl_db::WordContent;
use wl_srs::Outcome;

/// Body of `POST /study/record`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordOutcomeRequest {
    /// Word that was answered
    pub word_id: Uuid,
    /// Deck the word was studied from
    pub deck_id: Uuid,
    /// Whether the learner recalled the word
    pub correct: bool,
    /// Seconds spent on the attempt; defaults to 0 when omitted, at most one day
    #[serde(default)]
    #[validate(range(
        min = 0.0,
        max = 86400.0,
        message = "time_spent must be between 0 and 86400 seconds"
    ))]
    pub time_spent: f64,
}

impl RecordOutcomeRequest {
    /// The attempt as the scheduler sees it
    pub fn outcome(&self) -> Outcome {
        Outcome::new(self.correct, self.time_spent)
    }
}

/// A due word with the scheduling fields the study screen needs
#[derive(Debug, Clone, Serialize)]
pub struct ScheduledWord {
    /// Catalog content, inlined into the object
    #[serde(flatten)]
    pub word: WordContent,
    pub deck_id: Uuid,
    pub last_studied: DateTime<Utc>,
    pub next_review: DateTime<Utc>,
    /// Current correct streak
    pub consecutive_correct: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_time_spent_defaults_to_zero() {
        let request: RecordOutcomeRequest = serde_json::from_value(json!({
            "word_id": Uuid::new_v4(),
            "deck_id": Uuid::new_v4(),
            "correct": true
        }))
        .expect("Failed to deserialize request");

        assert_eq!(request.time_spent, 0.0);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_negative_time_spent_is_rejected() {
        let request = RecordOutcomeRequest {
            word_id: Uuid::new_v4(),
            deck_id: Uuid::new_v4(),
            correct: false,
            time_spent: -1.0,
        };

        assert!(request.validate().is_err());
    }

    #[test]
    fn test_time_spent_above_one_day_is_rejected() {
        let mut request = RecordOutcomeRequest {
            word_id: Uuid::new_v4(),
            deck_id: Uuid::new_v4(),
            correct: true,
            time_spent: 1e308,
        };
        assert!(request.validate().is_err());

        request.time_spent = wl_srs::record::MAX_ATTEMPT_SECONDS;
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_scheduled_word_is_flattened() {
        let now = Utc::now();
        let word = WordContent {
            id: Uuid::new_v4(),
            word: "hello".to_string(),
            translation: "hola".to_string(),
            example: "hello there".to_string(),
            pronunciation: String::new(),
        };
        let scheduled = ScheduledWord {
            word: word.clone(),
            deck_id: Uuid::new_v4(),
            last_studied: now,
            next_review: now,
            consecutive_correct: 0,
        };

        let value = serde_json::to_value(&scheduled).expect("Failed to serialize");
        assert_eq!(value["id"], json!(word.id));
        assert_eq!(value["translation"], "hola");
        assert_eq!(value["consecutive_correct"], 0);
    }
}
