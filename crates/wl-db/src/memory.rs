//! In-process review store and catalog.
//!
//! Used by tests and local development. It honors the same contract as [`PgStore`](crate::PgStore):
//! one record per triple, versioned compare-and-swap writes, due candidates ordered by
//! `next_review`. Locks are held only for a map probe and never across an `.await`.

use std::{
    collections::HashMap,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;
use wl_srs::{ReviewKey, ReviewRecord};

use crate::{ReviewStore, StoreError, Versioned, WordCatalog, WordContent};

#[derive(Debug)]
struct MemoryDeck {
    owner: Uuid,
    words: Vec<Uuid>,
}

#[derive(Debug)]
struct MemoryWord {
    owner: Uuid,
    content: WordContent,
}

/// In-process store for tests and local runs.
///
/// Holds review records plus a minimal deck/word catalog seeded with
/// [`add_deck`](Self::add_deck) and [`add_word`](Self::add_word).
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<ReviewKey, Versioned<ReviewRecord>>>,
    decks: RwLock<HashMap<Uuid, MemoryDeck>>,
    words: RwLock<HashMap<Uuid, MemoryWord>>,
}

fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, StoreError> {
    lock.read()
        .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
}

fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, StoreError> {
    lock.write()
        .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an empty deck owned by `user`.
    pub fn add_deck(&self, user: Uuid, deck: Uuid) -> Result<(), StoreError> {
        write(&self.decks)?.insert(
            deck,
            MemoryDeck {
                owner: user,
                words: Vec::new(),
            },
        );
        Ok(())
    }

    /// Add a word owned by `user` and link it into `deck`.
    pub fn add_word(&self, user: Uuid, deck: Uuid, content: WordContent) -> Result<(), StoreError> {
        let word_id = content.id;
        write(&self.words)?.insert(
            word_id,
            MemoryWord {
                owner: user,
                content,
            },
        );

        let mut decks = write(&self.decks)?;
        let entry = decks.entry(deck).or_insert_with(|| MemoryDeck {
            owner: user,
            words: Vec::new(),
        });
        if !entry.words.contains(&word_id) {
            entry.words.push(word_id);
        }
        Ok(())
    }

    /// Drop a word from the catalog, leaving any review records behind.
    pub fn remove_word(&self, word: Uuid) -> Result<(), StoreError> {
        write(&self.words)?.remove(&word);
        for deck in write(&self.decks)?.values_mut() {
            deck.words.retain(|id| *id != word);
        }
        Ok(())
    }

    /// Number of stored review records, across all users.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(read(&self.records)?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(read(&self.records)?.is_empty())
    }

    fn collect_words(&self, user: Uuid, ids: &[Uuid]) -> Result<Vec<WordContent>, StoreError> {
        let words = read(&self.words)?;
        Ok(ids
            .iter()
            .filter_map(|id| words.get(id))
            .filter(|w| w.owner == user)
            .map(|w| w.content.clone())
            .collect())
    }

    fn word_owned_by(&self, user: Uuid, word: Uuid) -> Result<bool, StoreError> {
        Ok(read(&self.words)?
            .get(&word)
            .is_some_and(|w| w.owner == user))
    }
}

#[async_trait]
impl ReviewStore for MemoryStore {
    async fn get(&self, key: ReviewKey) -> Result<Option<Versioned<ReviewRecord>>, StoreError> {
        Ok(read(&self.records)?.get(&key).cloned())
    }

    async fn insert(&self, record: &ReviewRecord) -> Result<bool, StoreError> {
        let mut records = write(&self.records)?;
        let key = record.key();
        if records.contains_key(&key) {
            return Ok(false);
        }
        records.insert(
            key,
            Versioned {
                value: record.clone(),
                version: 1,
            },
        );
        Ok(true)
    }

    async fn compare_and_swap(
        &self,
        record: &ReviewRecord,
        expected_version: i64,
    ) -> Result<bool, StoreError> {
        let mut records = write(&self.records)?;
        match records.get_mut(&record.key()) {
            Some(stored) if stored.version == expected_version => {
                stored.value = record.clone();
                stored.version += 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn due_candidates(
        &self,
        user: Uuid,
        as_of: DateTime<Utc>,
    ) -> Result<Vec<ReviewRecord>, StoreError> {
        let mut due: Vec<ReviewRecord> = read(&self.records)?
            .values()
            .filter(|stored| stored.value.user == user && stored.value.next_review <= as_of)
            .map(|stored| stored.value.clone())
            .collect();
        due.sort_by(|a, b| a.next_review.cmp(&b.next_review).then(a.word.cmp(&b.word)));
        Ok(due)
    }

    async fn records_for_deck(
        &self,
        user: Uuid,
        deck: Uuid,
    ) -> Result<Vec<ReviewRecord>, StoreError> {
        Ok(read(&self.records)?
            .values()
            .filter(|stored| stored.value.user == user && stored.value.deck == deck)
            .map(|stored| stored.value.clone())
            .collect())
    }
}

#[async_trait]
impl WordCatalog for MemoryStore {
    async fn deck_word_count(&self, user: Uuid, deck: Uuid) -> Result<Option<i64>, StoreError> {
        Ok(read(&self.decks)?
            .get(&deck)
            .filter(|d| d.owner == user)
            .map(|d| d.words.len() as i64))
    }

    async fn deck_contains_word(
        &self,
        user: Uuid,
        deck: Uuid,
        word: Uuid,
    ) -> Result<bool, StoreError> {
        let in_deck = read(&self.decks)?
            .get(&deck)
            .is_some_and(|d| d.owner == user && d.words.contains(&word));
        Ok(in_deck && self.word_owned_by(user, word)?)
    }

    async fn words(&self, user: Uuid, ids: &[Uuid]) -> Result<Vec<WordContent>, StoreError> {
        self.collect_words(user, ids)
    }

    async fn deck_words(&self, user: Uuid, deck: Uuid) -> Result<Vec<WordContent>, StoreError> {
        let ids = {
            let decks = read(&self.decks)?;
            match decks.get(&deck) {
                Some(d) if d.owner == user => d.words.clone(),
                _ => return Ok(Vec::new()),
            }
        };
        self.collect_words(user, &ids)
    }
}
