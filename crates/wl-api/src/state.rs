use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;
use wl_db::{MemoryStore, PgStore, ReviewStore, WordCatalog};
use wl_srs::Scheduler;

use crate::{ApiConfig, config::Environment};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct ApiState {
    pub reviews: Arc<dyn ReviewStore>,
    pub catalog: Arc<dyn WordCatalog>,
    pub scheduler: Scheduler,
    pub jwt_secret: String,
    pub environment: Environment,
    /// Extra attempts after a lost optimistic write
    pub write_retries: u32,
}

/// Subset of state needed by the [`AuthUser`](crate::auth::AuthUser) extractor
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

impl ApiState {
    /// Build state backed by Postgres for both review records and the catalog.
    pub fn new(config: &ApiConfig, pool: PgPool) -> Self {
        let store = Arc::new(PgStore::new(pool));

        Self {
            reviews: store.clone(),
            catalog: store,
            scheduler: Scheduler::new(config.scheduler_policy()),
            jwt_secret: config.jwt_secret.clone(),
            environment: config.environment.clone(),
            write_retries: config.write_retries,
        }
    }

    /// Build state over an in-process store, for tests and local experiments.
    pub fn in_memory(config: &ApiConfig, store: Arc<MemoryStore>) -> Self {
        Self {
            reviews: store.clone(),
            catalog: store,
            scheduler: Scheduler::new(config.scheduler_policy()),
            jwt_secret: config.jwt_secret.clone(),
            environment: config.environment.clone(),
            write_retries: config.write_retries,
        }
    }
}

impl std::fmt::Debug for ApiState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiState")
            .field("scheduler", &self.scheduler)
            .field("environment", &self.environment)
            .field("write_retries", &self.write_retries)
            .finish_non_exhaustive()
    }
}

impl FromRef<ApiState> for AuthConfig {
    fn from_ref(state: &ApiState) -> Self {
        Self {
            jwt_secret: state.jwt_secret.clone(),
        }
    }
}
