use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use wl_db::StoreError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Authentication error: {0}")]
    Auth(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status the error is reported with
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Jwt(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Store and internal failures are logged in full but not echoed to the client
        let message = match &self {
            Self::Store(e) => {
                tracing::error!(error = %e, "Review store unavailable");
                "Storage temporarily unavailable, please retry".to_string()
            }
            Self::Jwt(e) => {
                tracing::error!(error = %e, "JWT processing failed");
                "Internal server error".to_string()
            }
            Self::Internal(e) => {
                tracing::error!(error = %e, "Internal error");
                "Internal server error".to_string()
            }
            Self::Auth(msg) | Self::NotFound(msg) | Self::Validation(msg) | Self::Conflict(msg) => {
                msg.clone()
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
