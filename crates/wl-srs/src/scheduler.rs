use chrono::{DateTime, Duration, Utc};

use crate::{
    DeckStats, Outcome, ReviewEvent, ReviewKey, ReviewRecord, SchedulerPolicy,
    stats::percentage_one_decimal,
};

/// Review scheduler bound to a [`SchedulerPolicy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Scheduler {
    policy: SchedulerPolicy,
}

impl Scheduler {
    /// Scheduler applying `policy`.
    pub const fn new(policy: SchedulerPolicy) -> Self {
        Self { policy }
    }

    /// The policy in effect.
    pub const fn policy(&self) -> &SchedulerPolicy {
        &self.policy
    }

    /// Get the review interval in days for a given correct streak.
    ///
    /// # Algorithm
    ///
    /// * Streak 0: 0 days (due immediately)
    /// * Streak k ≥ 1: `min(max_interval_days, 2^(k-1))` days
    ///
    /// With the default ceiling of 365 days the sequence is
    /// 1, 2, 4, 8, 16, 32, 64, 128, 256, 365, 365, ...
    pub fn interval_days(&self, consecutive_correct: i32) -> i64 {
        if consecutive_correct <= 0 {
            return 0;
        }

        let cap = self.policy.max_interval_days.max(1);
        let exponent = (consecutive_correct - 1) as u32;

        match 1u64.checked_shl(exponent) {
            Some(days) if days <= cap as u64 => days as i64,
            _ => cap,
        }
    }

    /// Apply one observed outcome to a record and return the next state.
    ///
    /// `existing` is `None` on the first attempt for the triple, in which case a fresh
    /// record is built for `key`. When a record is given, its own key wins over `key`.
    ///
    /// A correct answer extends the streak and pushes `next_review` out by
    /// [`interval_days`](Self::interval_days). A miss resets the streak and makes the word
    /// due at `now`.
    pub fn record_outcome(
        &self,
        key: ReviewKey,
        existing: Option<ReviewRecord>,
        outcome: Outcome,
        now: DateTime<Utc>,
    ) -> ReviewRecord {
        let mut record = existing.unwrap_or_else(|| ReviewRecord {
            user: key.user,
            word: key.word,
            deck: key.deck,
            last_studied: now,
            next_review: now,
            times_studied: 0,
            times_correct: 0,
            consecutive_correct: 0,
            time_spent: 0.0,
            history: Vec::new(),
        });

        record.times_studied = record.times_studied.saturating_add(1);
        // Stays finite even for totals loaded from an older store
        record.time_spent = (record.time_spent + outcome.time_spent).min(f64::MAX);
        record.last_studied = now;
        record.history.push(ReviewEvent {
            at: now,
            correct: outcome.correct,
            time_spent: outcome.time_spent,
        });

        if outcome.correct {
            record.times_correct = record.times_correct.saturating_add(1);
            record.consecutive_correct = record.consecutive_correct.saturating_add(1);
            record.next_review = now + Duration::days(self.interval_days(record.consecutive_correct));
        } else {
            record.consecutive_correct = 0;
            record.next_review = now;
        }

        record
    }

    /// Select the records due at `as_of`, preserving input order.
    ///
    /// The returned iterator borrows `records` and can be cloned to restart the scan.
    pub fn due_items<'a>(
        &self,
        records: &'a [ReviewRecord],
        as_of: DateTime<Utc>,
    ) -> impl Iterator<Item = &'a ReviewRecord> + Clone + use<'a> {
        records.iter().filter(move |record| record.is_due(as_of))
    }

    /// Derive deck statistics from the learner's records on that deck.
    pub fn compute_stats(
        &self,
        records: &[ReviewRecord],
        total_words: i64,
        now: DateTime<Utc>,
    ) -> DeckStats {
        let today_start = now - self.policy.today_window;

        let mut mastered_words = 0;
        let mut today_studied = 0;
        let mut total_attempts: i64 = 0;
        let mut total_correct: i64 = 0;
        let mut total_time = 0.0;

        for record in records {
            if record.is_mastered(&self.policy) {
                mastered_words += 1;
            }
            if record.last_studied >= today_start {
                today_studied += 1;
            }
            total_attempts = total_attempts.saturating_add(record.times_studied);
            total_correct = total_correct.saturating_add(record.times_correct);
            total_time = (total_time + record.time_spent).min(f64::MAX);
        }

        let average_time_spent = if total_attempts > 0 {
            total_time / total_attempts as f64
        } else {
            0.0
        };

        DeckStats {
            total_words,
            studied_words: records.len() as i64,
            mastered_words,
            today_studied,
            accuracy: percentage_one_decimal(total_correct, total_attempts),
            average_time_spent,
        }
    }
}
