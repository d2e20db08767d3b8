use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;
use wl_db::WordContent;
use wl_srs::{DeckStats, ReviewKey, ReviewRecord};

use super::{
    model::{RecordOutcomeRequest, ScheduledWord},
    service,
};
use crate::{ApiState, auth::AuthUser, error::ApiError};

/// Create the study routes, all behind [`AuthUser`]
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/study/record", post(record_outcome))
        .route("/study/scheduled", get(get_scheduled_words))
        .route("/study/stats/{deck_id}", get(get_deck_stats))
        .route("/study/deck/{deck_id}", get(get_deck_words))
}

async fn record_outcome(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Json(payload): Json<RecordOutcomeRequest>,
) -> Result<Json<ReviewRecord>, ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    // The word must belong to one of the caller's decks
    if !state
        .catalog
        .deck_contains_word(auth_user.user_id, payload.deck_id, payload.word_id)
        .await?
    {
        return Err(ApiError::NotFound("Word not found in deck".to_string()));
    }

    let key = ReviewKey::new(auth_user.user_id, payload.word_id, payload.deck_id);

    let record = service::record_review(
        state.reviews.as_ref(),
        &state.scheduler,
        key,
        payload.outcome(),
        Utc::now(),
        state.write_retries,
    )
    .await?;

    Ok(Json(record))
}

async fn get_scheduled_words(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<Vec<ScheduledWord>>, ApiError> {
    let words = service::scheduled_words(
        state.reviews.as_ref(),
        state.catalog.as_ref(),
        &state.scheduler,
        auth_user.user_id,
        Utc::now(),
    )
    .await?;

    Ok(Json(words))
}

async fn get_deck_stats(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(deck_id): Path<Uuid>,
) -> Result<Json<DeckStats>, ApiError> {
    let stats = service::deck_stats(
        state.reviews.as_ref(),
        state.catalog.as_ref(),
        &state.scheduler,
        auth_user.user_id,
        deck_id,
        Utc::now(),
    )
    .await?;

    Ok(Json(stats))
}

async fn get_deck_words(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(deck_id): Path<Uuid>,
) -> Result<Json<Vec<WordContent>>, ApiError> {
    let words = service::deck_words(state.catalog.as_ref(), auth_user.user_id, deck_id).await?;

    Ok(Json(words))
}
