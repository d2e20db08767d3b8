use axum::{Router, middleware, routing::get};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use wl_api::{config::ApiConfig, state::ApiState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::from_env()?;

    wl_api::tracing::init_tracing(&config.environment);

    let metrics_handle = wl_api::metrics::init_metrics()?;
    tracing::info!("Prometheus metrics exporter initialized");

    let pool = wl_db::create_pool(&config.database_url, config.db_max_connections).await?;
    wl_db::ensure_db_and_migrate(&config.database_url, &pool).await?;

    let state = ApiState::new(&config, pool);
    tracing::info!(scheduler = ?state.scheduler, write_retries = state.write_retries, "Scheduler configured");

    let cors = wl_api::middleware::cors::create_cors_layer(config.allowed_origins.clone());

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Metrics live outside the API state
    let metrics_app = Router::new()
        .route("/metrics", get(wl_api::metrics::metrics_handler))
        .with_state(metrics_handle);

    let app = wl_api::router::router()
        .with_state(state)
        .merge(metrics_app)
        .layer(cors)
        .layer(trace_layer)
        .layer(middleware::from_fn(wl_api::metrics::track_metrics))
        .layer(middleware::from_fn(
            wl_api::middleware::request_id::request_id_middleware,
        ));

    let app = wl_api::middleware::security_headers::apply_security_headers(
        app,
        config.environment.clone(),
    );

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(
        environment = ?config.environment,
        address = %listener.local_addr()?,
        "Server listening"
    );
    axum::serve(listener, app).await?;

    Ok(())
}
