use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::SchedulerPolicy;

/// Longest single attempt accepted, in seconds (one day).
pub const MAX_ATTEMPT_SECONDS: f64 = 86_400.0;

/// The (user, word, deck) triple identifying one review record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReviewKey {
    /// Learner
    pub user: Uuid,
    /// Word being memorized
    pub word: Uuid,
    /// Deck the word is studied from
    pub deck: Uuid,
}

impl ReviewKey {
    /// Name a triple.
    pub const fn new(user: Uuid, word: Uuid, deck: Uuid) -> Self {
        Self { user, word, deck }
    }
}

/// A single reported attempt, already sanitized at the caller boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome {
    /// Whether the learner recalled the word
    pub correct: bool,
    /// Elapsed time in seconds, within `0..=MAX_ATTEMPT_SECONDS`
    pub time_spent: f64,
}

impl Outcome {
    /// Negative, NaN and infinite durations become zero; longer than
    /// [`MAX_ATTEMPT_SECONDS`] is cut to that limit.
    pub fn new(correct: bool, time_spent: f64) -> Self {
        let time_spent = if time_spent.is_finite() {
            time_spent.clamp(0.0, MAX_ATTEMPT_SECONDS)
        } else {
            0.0
        };
        Self {
            correct,
            time_spent,
        }
    }

    /// A recalled attempt.
    pub fn correct(time_spent: f64) -> Self {
        Self::new(true, time_spent)
    }

    /// A missed attempt.
    pub fn incorrect(time_spent: f64) -> Self {
        Self::new(false, time_spent)
    }
}

/// One entry of the append-only attempt history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewEvent {
    /// When the attempt happened
    pub at: DateTime<Utc>,
    /// Whether the learner recalled the word
    pub correct: bool,
    /// Seconds spent on the attempt
    pub time_spent: f64,
}

/// Per-(user, word, deck) scheduling state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// Learner owning the record
    pub user: Uuid,
    /// Word being memorized
    pub word: Uuid,
    /// Deck the word was studied from
    pub deck: Uuid,
    /// Timestamp of the most recent attempt
    pub last_studied: DateTime<Utc>,
    /// The record is due at or after this instant
    pub next_review: DateTime<Utc>,
    /// Number of attempts
    pub times_studied: i64,
    /// Number of correct attempts, never above `times_studied`
    pub times_correct: i64,
    /// Current correct streak, reset to 0 on a miss
    pub consecutive_correct: i32,
    /// Cumulative seconds across attempts
    pub time_spent: f64,
    /// One entry per attempt, oldest first
    pub history: Vec<ReviewEvent>,
}

impl ReviewRecord {
    /// The triple this record belongs to.
    pub const fn key(&self) -> ReviewKey {
        ReviewKey::new(self.user, self.word, self.deck)
    }

    /// Whether the record should be presented for review at `as_of`.
    pub fn is_due(&self, as_of: DateTime<Utc>) -> bool {
        self.next_review <= as_of
    }

    /// Whether the current streak reaches the policy's mastery threshold.
    pub const fn is_mastered(&self, policy: &SchedulerPolicy) -> bool {
        self.consecutive_correct >= policy.mastery_threshold
    }
}
