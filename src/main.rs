use std::sync::{Arc, Mutex};

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use booking_service::config::AppConfig;
use booking_service::db;
use booking_service::handlers;
use booking_service::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db_with_retry(
        &config.database_url,
        db::CONNECT_ATTEMPTS,
        db::CONNECT_RETRY_DELAY,
    )
    .await?;

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/bookings",
            post(handlers::api::create_booking).get(handlers::api::list_bookings),
        )
        .route("/bookings/:id", delete(handlers::api::delete_booking))
        .route(
            "/bookings/:id/reschedule",
            put(handlers::api::reschedule_booking),
        )
        .route("/", get(handlers::forms::dashboard))
        .route("/add", post(handlers::forms::add_booking))
        .route(
            "/delete/:id",
            get(handlers::forms::delete_booking).post(handlers::forms::delete_booking),
        )
        .route("/reschedule/:id", post(handlers::forms::reschedule_booking))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
