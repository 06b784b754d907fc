mod error;
mod middleware;
mod routes;

use axum::{routing::get, Json};
use http::{header, HeaderValue, Method};
use std::{sync::Arc, time::Duration};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;

use eh_config::Config;
use eh_core::{
    Booking, BookingInput, BookingPatch, Event, EventDetails, EventInput, EventPatch, EventSummary,
};
use eh_storage::{ConnectionManager, SqliteConnector};

/// Process-wide context handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<ConnectionManager<SqliteConnector>>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::health::healthz,
        routes::health::ping,
        routes::events::list_events,
        routes::events::create_event,
        routes::events::get_event,
        routes::events::update_event,
        routes::events::list_event_bookings,
        routes::bookings::create_booking,
        routes::bookings::update_booking,
    ),
    components(schemas(
        Event,
        EventDetails,
        EventSummary,
        EventInput,
        EventPatch,
        Booking,
        BookingInput,
        BookingPatch,
    )),
    tags(
        (name = "eh-api", description = "EventHub API")
    )
)]
struct ApiDoc;

/// Build CORS layer allowing loopback plus the configured presentation origins
fn build_cors_layer(config: &Config) -> CorsLayer {
    let allowed = config.allowed_origins.clone();

    let origin_pred = AllowOrigin::predicate(move |origin: &HeaderValue, _req| {
        middleware::cors::origin_allowed(origin, &allowed)
    });

    CorsLayer::new()
        .allow_origin(origin_pred)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600))
        .allow_credentials(false)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Tracing (JSON logs)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_current_span(false)
        .init();

    // A missing DATABASE_URL stops the process here.
    let config = Config::load()?;
    info!("Starting eh-api on {}", config.bind_addr);

    let db = Arc::new(ConnectionManager::new(SqliteConnector::from_config(&config)));
    // Warm the connection; on failure the first request tries again.
    if let Err(e) = db.connection().await {
        warn!("Database not ready at startup: {}", e);
    }

    let state = AppState { db };
    let api = ApiDoc::openapi();
    let cors = build_cors_layer(&config);

    let app = routes::router(state)
        .route("/openapi.json", get(|| async move { Json(api) }))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
