use thiserror::Error;

/// Failure talking to the review store.
///
/// Every variant is transient from the caller's point of view: the request may be retried.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Query or connection failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    /// The in-process store can no longer be used (poisoned lock)
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}
