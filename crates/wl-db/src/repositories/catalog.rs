use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::WordContent;

/// Number of words in a deck owned by `user_id`, or `None` if there is no such deck.
pub async fn get_deck_word_count<'e, E>(
    executor: E,
    user_id: Uuid,
    deck_id: Uuid,
) -> Result<Option<i64>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT COUNT(dw.word_id)
            FROM decks d
            LEFT JOIN deck_words dw ON dw.deck_id = d.id
            WHERE d.id = $1 AND d.user_id = $2
            GROUP BY d.id
        "#,
    )
    .bind(deck_id)
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

/// Verify that a word belongs to a deck and both are owned by the given user.
pub async fn deck_contains_word<'e, E>(
    executor: E,
    user_id: Uuid,
    deck_id: Uuid,
    word_id: Uuid,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let exists: bool = sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT EXISTS(
                SELECT 1
                FROM deck_words dw
                JOIN decks d ON d.id = dw.deck_id
                JOIN words w ON w.id = dw.word_id
                WHERE dw.deck_id = $1 AND dw.word_id = $2
                    AND d.user_id = $3 AND w.user_id = $3
            )
        "#,
    )
    .bind(deck_id)
    .bind(word_id)
    .bind(user_id)
    .fetch_one(executor)
    .await?;
    Ok(exists)
}

/// Words among `word_ids` owned by `user_id`; unknown ids are skipped.
pub async fn get_words_by_ids<'e, E>(
    executor: E,
    user_id: Uuid,
    word_ids: &[Uuid],
) -> Result<Vec<WordContent>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, word, translation, example, pronunciation
            FROM words
            WHERE user_id = $1 AND id = ANY($2)
        "#,
    )
    .bind(user_id)
    .bind(word_ids)
    .fetch_all(executor)
    .await
}

/// Words linked to a deck owned by `user_id`, oldest link first.
pub async fn get_deck_words<'e, E>(
    executor: E,
    user_id: Uuid,
    deck_id: Uuid,
) -> Result<Vec<WordContent>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT w.id, w.word, w.translation, w.example, w.pronunciation
            FROM deck_words dw
            JOIN decks d ON d.id = dw.deck_id
            JOIN words w ON w.id = dw.word_id
            WHERE dw.deck_id = $1 AND d.user_id = $2 AND w.user_id = $2
            ORDER BY dw.added_at ASC
        "#,
    )
    .bind(deck_id)
    .bind(user_id)
    .fetch_all(executor)
    .await
}
