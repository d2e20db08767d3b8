//! Store seams consumed by the study service.
//!
//! [`ReviewStore`] owns the per-(user, word, deck) scheduling state; [`WordCatalog`] is a
//! read-only view onto decks and words owned by the surrounding CRUD service.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;
use wl_srs::{ReviewKey, ReviewRecord};

use crate::{StoreError, Versioned, WordContent};

/// Keyed collection of review records with a uniqueness guarantee on the triple.
///
/// Writes are optimistic: read with [`get`](Self::get), compute the next state, then either
/// [`insert`](Self::insert) (no prior record) or [`compare_and_swap`](Self::compare_and_swap)
/// against the version that was read. A `false` result means another writer won the race and
/// the caller should re-read and retry.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Current record of a triple and the version it is at.
    async fn get(&self, key: ReviewKey) -> Result<Option<Versioned<ReviewRecord>>, StoreError>;

    /// Create the record for a triple that has none yet.
    async fn insert(&self, record: &ReviewRecord) -> Result<bool, StoreError>;

    /// Replace the record if it is still at `expected_version`.
    async fn compare_and_swap(
        &self,
        record: &ReviewRecord,
        expected_version: i64,
    ) -> Result<bool, StoreError>;

    /// Candidate records for a due scan, ordered by `next_review` ascending.
    async fn due_candidates(
        &self,
        user: Uuid,
        as_of: DateTime<Utc>,
    ) -> Result<Vec<ReviewRecord>, StoreError>;

    /// Every record of `user` on `deck`, in no particular order.
    async fn records_for_deck(&self, user: Uuid, deck: Uuid)
    -> Result<Vec<ReviewRecord>, StoreError>;
}

/// Read access to the externally owned deck and word catalog.
#[async_trait]
pub trait WordCatalog: Send + Sync {
    /// Word count of a deck owned by `user`; `None` if missing or owned by someone else.
    async fn deck_word_count(&self, user: Uuid, deck: Uuid) -> Result<Option<i64>, StoreError>;

    /// Whether `word` is in `deck` and both belong to `user`.
    async fn deck_contains_word(
        &self,
        user: Uuid,
        deck: Uuid,
        word: Uuid,
    ) -> Result<bool, StoreError>;

    /// Content of the given words owned by `user`. Unknown ids are silently left out.
    async fn words(&self, user: Uuid, ids: &[Uuid]) -> Result<Vec<WordContent>, StoreError>;

    /// Words of a deck owned by `user`, in the order they were added.
    async fn deck_words(&self, user: Uuid, deck: Uuid) -> Result<Vec<WordContent>, StoreError>;
}
