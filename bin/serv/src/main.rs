use axum::{Router, middleware, routing::get};
use cm_api::{ApiConfig, ApiState};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::from_env()?;

    cm_api::tracing::init_tracing(&config.env);

    let metrics_handle = cm_api::metrics::init_metrics()?;
    tracing::info!("Prometheus metrics exporter initialized");

    cm_db::ensure_database(&config.database_url).await?;
    let pool = cm_db::create_pool(&config.database_url, config.db_max_connections).await?;
    cm_db::migrate(&pool).await?;

    let state = ApiState::new(&config, pool);

    let cors = cm_api::middleware::cors::create_cors_layer(config.parsed_allowed_origins());

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Metrics have their own state, so they are mounted beside the API router
    let metrics_app = Router::new()
        .route("/metrics", get(cm_api::metrics::metrics_handler))
        .with_state(metrics_handle);

    let app = cm_api::router::router()
        .with_state(state)
        .merge(metrics_app)
        .layer(cors)
        .layer(trace_layer)
        .layer(middleware::from_fn(cm_api::metrics::track_metrics))
        .layer(middleware::from_fn(
            cm_api::middleware::request_id::request_id_middleware,
        ));

    let app = cm_api::middleware::security_headers::apply_security_headers(app, config.env.clone());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(port = config.port, env = ?config.env, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
