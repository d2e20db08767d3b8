use chrono::{DateTime, Utc};
use sqlx::{Executor, Postgres, types::Json};
use uuid::Uuid;
use wl_srs::{ReviewKey, ReviewRecord};

use crate::models::ReviewRecordRow;

/// Load the row of one triple, if any.
pub async fn get_review_record<'e, E>(
    executor: E,
    key: ReviewKey,
) -> Result<Option<ReviewRecordRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT user_id, word_id, deck_id, last_studied, next_review, times_studied,
                   times_correct, consecutive_correct, time_spent, history, version
            FROM review_records
            WHERE user_id = $1 AND word_id = $2 AND deck_id = $3
        "#,
    )
    .bind(key.user)
    .bind(key.word)
    .bind(key.deck)
    .fetch_optional(executor)
    .await
}

/// Insert the first record for a triple.
///
/// Returns `false` without touching the existing row when the triple is already present.
pub async fn insert_review_record<'e, E>(
    executor: E,
    record: &ReviewRecord,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            INSERT INTO review_records (
                user_id, word_id, deck_id, last_studied, next_review, times_studied,
                times_correct, consecutive_correct, time_spent, history, version
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 1)
            ON CONFLICT (user_id, word_id, deck_id) DO NOTHING
        "#,
    )
    .bind(record.user)
    .bind(record.word)
    .bind(record.deck)
    .bind(record.last_studied)
    .bind(record.next_review)
    .bind(record.times_studied)
    .bind(record.times_correct)
    .bind(record.consecutive_correct)
    .bind(record.time_spent)
    .bind(Json(&record.history))
    .execute(executor)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Overwrite a record only if it is still at `expected_version`, bumping the version.
///
/// Returns `false` when another writer got there first.
pub async fn update_review_record<'e, E>(
    executor: E,
    record: &ReviewRecord,
    expected_version: i64,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            UPDATE review_records
            SET last_studied = $4,
                next_review = $5,
                times_studied = $6,
                times_correct = $7,
                consecutive_correct = $8,
                time_spent = $9,
                history = $10,
                version = version + 1,
                updated_at = NOW()
            WHERE user_id = $1 AND word_id = $2 AND deck_id = $3 AND version = $11
        "#,
    )
    .bind(record.user)
    .bind(record.word)
    .bind(record.deck)
    .bind(record.last_studied)
    .bind(record.next_review)
    .bind(record.times_studied)
    .bind(record.times_correct)
    .bind(record.consecutive_correct)
    .bind(record.time_spent)
    .bind(Json(&record.history))
    .bind(expected_version)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Records of a user due at or before `as_of`, most overdue first.
pub async fn list_due_records<'e, E>(
    executor: E,
    user_id: Uuid,
    as_of: DateTime<Utc>,
) -> Result<Vec<ReviewRecordRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT user_id, word_id, deck_id, last_studied, next_review, times_studied,
                   times_correct, consecutive_correct, time_spent, history, version
            FROM review_records
            WHERE user_id = $1 AND next_review <= $2
            ORDER BY next_review ASC, word_id ASC
        "#,
    )
    .bind(user_id)
    .bind(as_of)
    .fetch_all(executor)
    .await
}

/// All records of a user on one deck.
pub async fn list_deck_records<'e, E>(
    executor: E,
    user_id: Uuid,
    deck_id: Uuid,
) -> Result<Vec<ReviewRecordRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT user_id, word_id, deck_id, last_studied, next_review, times_studied,
                   times_correct, consecutive_correct, time_spent, history, version
            FROM review_records
            WHERE user_id = $1 AND deck_id = $2
        "#,
    )
    .bind(user_id)
    .bind(deck_id)
    .fetch_all(executor)
    .await
}
