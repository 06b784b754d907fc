use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use tracing::warn;

use crate::AppState;

#[utoipa::path(
    get,
    path = "/healthz",
    responses(
        (status = 200, description = "OK")
    )
)]
pub async fn healthz() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

#[utoipa::path(
    get,
    path = "/api/v1/ping",
    responses(
        (status = 200, description = "Ping with DB check"),
        (status = 503, description = "Database unreachable")
    )
)]
pub async fn ping(State(state): State<AppState>) -> Result<Json<serde_json::Value>, StatusCode> {
    let pool = state.db.connection().await.map_err(|e| {
        warn!("Ping failed: {}", e);
        StatusCode::SERVICE_UNAVAILABLE
    })?;

    // Test DB connection with simple query
    let result: Result<i64, _> = sqlx::query_scalar("SELECT 1").fetch_one(&pool).await;

    match result {
        Ok(_) => Ok(Json(json!({"ok": true, "db": "up"}))),
        Err(e) => {
            warn!("Ping query failed: {}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
