//! Study operations: the read-modify-write loop around the scheduler and the read-side
//! views (due words, deck statistics).

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use uuid::Uuid;
use wl_db::{ReviewStore, Versioned, WordCatalog, WordContent};
use wl_srs::{DeckStats, Outcome, ReviewKey, ReviewRecord, Scheduler};

use super::model::ScheduledWord;
use crate::{error::ApiError, metrics};

/// Apply an outcome to the record of `key` and persist it.
///
/// The record is read, advanced by the scheduler, and written back with an optimistic
/// version check. When another writer updated (or created) the same triple in between,
/// the whole cycle is repeated, up to `write_retries` extra times.
pub async fn record_review(
    reviews: &dyn ReviewStore,
    scheduler: &Scheduler,
    key: ReviewKey,
    outcome: Outcome,
    now: DateTime<Utc>,
    write_retries: u32,
) -> Result<ReviewRecord, ApiError> {
    for attempt in 0..=write_retries {
        let (existing, version) = match reviews.get(key).await? {
            Some(Versioned { value, version }) => (Some(value), Some(version)),
            None => (None, None),
        };

        let next = scheduler.record_outcome(key, existing, outcome, now);

        let written = match version {
            Some(version) => reviews.compare_and_swap(&next, version).await?,
            None => reviews.insert(&next).await?,
        };

        if written {
            metrics::record_review(outcome.correct);
            tracing::info!(
                user_id = %key.user,
                word_id = %key.word,
                deck_id = %key.deck,
                correct = outcome.correct,
                streak = next.consecutive_correct,
                next_review = %next.next_review,
                "Recorded review outcome"
            );
            return Ok(next);
        }

        metrics::record_write_conflict();
        tracing::debug!(
            user_id = %key.user,
            word_id = %key.word,
            deck_id = %key.deck,
            attempt,
            "Concurrent update of review record, retrying"
        );
    }

    tracing::warn!(
        user_id = %key.user,
        word_id = %key.word,
        deck_id = %key.deck,
        write_retries,
        "Gave up recording review after repeated write conflicts"
    );
    Err(ApiError::Conflict(
        "Review record is being updated concurrently, please retry".to_string(),
    ))
}

/// Words due for review at `now`, most overdue first, with their content joined in.
///
/// Records whose word is no longer in the catalog are skipped.
pub async fn scheduled_words(
    reviews: &dyn ReviewStore,
    catalog: &dyn WordCatalog,
    scheduler: &Scheduler,
    user: Uuid,
    now: DateTime<Utc>,
) -> Result<Vec<ScheduledWord>, ApiError> {
    let candidates = reviews.due_candidates(user, now).await?;
    let due = scheduler.due_items(&candidates, now);

    let mut seen = HashSet::new();
    let word_ids: Vec<Uuid> = due
        .clone()
        .map(|record| record.word)
        .filter(|id| seen.insert(*id))
        .collect();

    let words: HashMap<Uuid, WordContent> = catalog
        .words(user, &word_ids)
        .await?
        .into_iter()
        .map(|word| (word.id, word))
        .collect();

    let scheduled = due
        .filter_map(|record| {
            let Some(word) = words.get(&record.word) else {
                tracing::debug!(
                    user_id = %user,
                    word_id = %record.word,
                    "Skipping due record for word missing from catalog"
                );
                return None;
            };

            Some(ScheduledWord {
                word: word.clone(),
                deck_id: record.deck,
                last_studied: record.last_studied,
                next_review: record.next_review,
                consecutive_correct: record.consecutive_correct,
            })
        })
        .collect();

    Ok(scheduled)
}

/// Statistics of `user` on `deck`, recomputed from the current records.
pub async fn deck_stats(
    reviews: &dyn ReviewStore,
    catalog: &dyn WordCatalog,
    scheduler: &Scheduler,
    user: Uuid,
    deck: Uuid,
    now: DateTime<Utc>,
) -> Result<DeckStats, ApiError> {
    let total_words = catalog
        .deck_word_count(user, deck)
        .await?
        .ok_or_else(|| ApiError::NotFound("Deck not found".to_string()))?;

    let records = reviews.records_for_deck(user, deck).await?;

    Ok(scheduler.compute_stats(&records, total_words, now))
}

/// Words of a deck for a study session.
pub async fn deck_words(
    catalog: &dyn WordCatalog,
    user: Uuid,
    deck: Uuid,
) -> Result<Vec<WordContent>, ApiError> {
    if catalog.deck_word_count(user, deck).await?.is_none() {
        return Err(ApiError::NotFound("Deck not found".to_string()));
    }

    Ok(catalog.deck_words(user, deck).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Duration;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };
    use wl_db::{MemoryStore, StoreError};

    /// Store whose writes always lose to another writer
    #[derive(Default)]
    struct AlwaysContended {
        inner: MemoryStore,
        reads: AtomicUsize,
    }

    #[async_trait]
    impl ReviewStore for AlwaysContended {
        async fn get(&self, key: ReviewKey) -> Result<Option<Versioned<ReviewRecord>>, StoreError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.get(key).await
        }

        async fn insert(&self, _record: &ReviewRecord) -> Result<bool, StoreError> {
            Ok(false)
        }

        async fn compare_and_swap(
            &self,
            _record: &ReviewRecord,
            _expected_version: i64,
        ) -> Result<bool, StoreError> {
            Ok(false)
        }

        async fn due_candidates(
            &self,
            user: Uuid,
            as_of: DateTime<Utc>,
        ) -> Result<Vec<ReviewRecord>, StoreError> {
            self.inner.due_candidates(user, as_of).await
        }

        async fn records_for_deck(
            &self,
            user: Uuid,
            deck: Uuid,
        ) -> Result<Vec<ReviewRecord>, StoreError> {
            self.inner.records_for_deck(user, deck).await
        }
    }

    fn word(text: &str) -> WordContent {
        WordContent {
            id: Uuid::new_v4(),
            word: text.to_string(),
            translation: format!("{text}-tr"),
            example: String::new(),
            pronunciation: String::new(),
        }
    }

    #[tokio::test]
    async fn test_first_outcome_creates_then_updates() {
        let store = MemoryStore::new();
        let scheduler = Scheduler::default();
        let key = ReviewKey::new(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let now = Utc::now();

        let first = record_review(&store, &scheduler, key, Outcome::correct(10.0), now, 3)
            .await
            .expect("first write");
        let second = record_review(&store, &scheduler, key, Outcome::correct(5.0), now, 3)
            .await
            .expect("second write");

        assert_eq!(first.times_studied, 1);
        assert_eq!(second.times_studied, 2);
        assert_eq!(second.consecutive_correct, 2);
        assert_eq!(second.time_spent, 15.0);
        assert_eq!(store.len().unwrap(), 1);
        assert_eq!(store.get(key).await.unwrap().unwrap().version, 2);
    }

    #[tokio::test]
    async fn test_conflict_after_retries_are_exhausted() {
        let store = AlwaysContended::default();
        let scheduler = Scheduler::default();
        let key = ReviewKey::new(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        let result = record_review(&store, &scheduler, key, Outcome::correct(1.0), Utc::now(), 2).await;

        assert!(matches!(result, Err(ApiError::Conflict(_))));
        assert_eq!(result.unwrap_err().status(), axum::http::StatusCode::CONFLICT);
        assert_eq!(store.reads.load(Ordering::SeqCst), 3);
        assert!(store.inner.is_empty().unwrap());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_outcomes_for_one_triple_are_all_applied() {
        let store = Arc::new(MemoryStore::new());
        let scheduler = Scheduler::default();
        let key = ReviewKey::new(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let now = Utc::now();

        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    record_review(
                        store.as_ref(),
                        &scheduler,
                        key,
                        Outcome::new(i % 2 == 0, 1.0),
                        now,
                        1_000,
                    )
                    .await
                })
            })
            .collect();

        for task in tasks {
            task.await.expect("task panicked").expect("write failed");
        }

        let stored = store.get(key).await.unwrap().expect("record exists");
        assert_eq!(store.len().unwrap(), 1);
        assert_eq!(stored.value.times_studied, 16);
        assert_eq!(stored.value.times_correct, 8);
        assert_eq!(stored.value.history.len(), 16);
        assert_eq!(stored.value.time_spent, 16.0);
        assert_eq!(stored.version, 16);
    }

    #[tokio::test]
    async fn test_scheduled_words_joins_catalog_and_skips_missing() {
        let store = MemoryStore::new();
        let scheduler = Scheduler::default();
        let user = Uuid::new_v4();
        let deck = Uuid::new_v4();
        let now = Utc::now();

        let missed = word("gato");
        let learned = word("perro");
        let removed = word("pez");
        for w in [&missed, &learned, &removed] {
            store.add_word(user, deck, w.clone()).unwrap();
        }

        let earlier = now - Duration::minutes(5);
        for (w, correct) in [(&missed, false), (&learned, true), (&removed, false)] {
            record_review(
                &store,
                &scheduler,
                ReviewKey::new(user, w.id, deck),
                Outcome::new(correct, 2.0),
                earlier,
                3,
            )
            .await
            .unwrap();
        }
        store.remove_word(removed.id).unwrap();

        let due = scheduled_words(&store, &store, &scheduler, user, now)
            .await
            .unwrap();

        assert_eq!(due.len(), 1);
        assert_eq!(due[0].word, missed);
        assert_eq!(due[0].deck_id, deck);
        assert_eq!(due[0].consecutive_correct, 0);

        let tomorrow = now + Duration::days(1);
        let due = scheduled_words(&store, &store, &scheduler, user, tomorrow)
            .await
            .unwrap();
        assert_eq!(due.len(), 2);
    }

    #[tokio::test]
    async fn test_deck_stats_requires_owned_deck() {
        let store = MemoryStore::new();
        let scheduler = Scheduler::default();
        let owner = Uuid::new_v4();
        let deck = Uuid::new_v4();
        store.add_deck(owner, deck).unwrap();

        let stats = deck_stats(&store, &store, &scheduler, owner, deck, Utc::now())
            .await
            .expect("owner can read stats");
        assert_eq!(stats.total_words, 0);
        assert_eq!(stats.accuracy, 0.0);

        let result = deck_stats(&store, &store, &scheduler, Uuid::new_v4(), deck, Utc::now()).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }
}
