use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use wl_srs::{ReviewKey, ReviewRecord};

use crate::{
    ReviewStore, StoreError, Versioned, WordCatalog, WordContent,
    repositories::{catalog, review},
};

/// Postgres-backed review store and catalog view
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap an existing, migrated pool.
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying connection pool.
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ReviewStore for PgStore {
    async fn get(&self, key: ReviewKey) -> Result<Option<Versioned<ReviewRecord>>, StoreError> {
        let row = review::get_review_record(&self.pool, key).await?;
        Ok(row.map(Versioned::from))
    }

    async fn insert(&self, record: &ReviewRecord) -> Result<bool, StoreError> {
        Ok(review::insert_review_record(&self.pool, record).await?)
    }

    async fn compare_and_swap(
        &self,
        record: &ReviewRecord,
        expected_version: i64,
    ) -> Result<bool, StoreError> {
        Ok(review::update_review_record(&self.pool, record, expected_version).await?)
    }

    async fn due_candidates(
        &self,
        user: Uuid,
        as_of: DateTime<Utc>,
    ) -> Result<Vec<ReviewRecord>, StoreError> {
        let rows = review::list_due_records(&self.pool, user, as_of).await?;
        Ok(rows.into_iter().map(ReviewRecord::from).collect())
    }

    async fn records_for_deck(
        &self,
        user: Uuid,
        deck: Uuid,
    ) -> Result<Vec<ReviewRecord>, StoreError> {
        let rows = review::list_deck_records(&self.pool, user, deck).await?;
        Ok(rows.into_iter().map(ReviewRecord::from).collect())
    }
}

#[async_trait]
impl WordCatalog for PgStore {
    async fn deck_word_count(&self, user: Uuid, deck: Uuid) -> Result<Option<i64>, StoreError> {
        Ok(catalog::get_deck_word_count(&self.pool, user, deck).await?)
    }

    async fn deck_contains_word(
        &self,
        user: Uuid,
        deck: Uuid,
        word: Uuid,
    ) -> Result<bool, StoreError> {
        Ok(catalog::deck_contains_word(&self.pool, user, deck, word).await?)
    }

    async fn words(&self, user: Uuid, ids: &[Uuid]) -> Result<Vec<WordContent>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(catalog::get_words_by_ids(&self.pool, user, ids).await?)
    }

    async fn deck_words(&self, user: Uuid, deck: Uuid) -> Result<Vec<WordContent>, StoreError> {
        Ok(catalog::get_deck_words(&self.pool, user, deck).await?)
    }
}
