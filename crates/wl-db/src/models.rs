use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;
use wl_srs::{ReviewEvent, ReviewRecord};

/// A stored value together with the version it was read at.
///
/// Writers pass `version` back to [`ReviewStore::compare_and_swap`](crate::ReviewStore::compare_and_swap)
/// so a concurrent write to the same triple is detected instead of overwritten.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    /// The stored value
    pub value: T,
    /// Starts at 1 and grows by one on every successful write
    pub version: i64,
}

/// Row of the `review_records` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReviewRecordRow {
    pub user_id: Uuid,
    pub word_id: Uuid,
    pub deck_id: Uuid,
    pub last_studied: DateTime<Utc>,
    pub next_review: DateTime<Utc>,
    pub times_studied: i64,
    pub times_correct: i64,
    pub consecutive_correct: i32,
    pub time_spent: f64,
    /// Append-only attempt log stored as JSONB
    pub history: Json<Vec<ReviewEvent>>,
    pub version: i64,
}

impl From<ReviewRecordRow> for Versioned<ReviewRecord> {
    fn from(row: ReviewRecordRow) -> Self {
        Self {
            version: row.version,
            value: ReviewRecord {
                user: row.user_id,
                word: row.word_id,
                deck: row.deck_id,
                last_studied: row.last_studied,
                next_review: row.next_review,
                times_studied: row.times_studied,
                times_correct: row.times_correct,
                consecutive_correct: row.consecutive_correct,
                time_spent: row.time_spent,
                history: row.history.0,
            },
        }
    }
}

impl From<ReviewRecordRow> for ReviewRecord {
    fn from(row: ReviewRecordRow) -> Self {
        Versioned::from(row).value
    }
}

/// Word content from the catalog, joined in for presentation only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct WordContent {
    pub id: Uuid,
    pub word: String,
    pub translation: String,
    pub example: String,
    pub pronunciation: String,
}
