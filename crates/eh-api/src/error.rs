use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use eh_storage::StoreError;
use serde_json::json;
use tracing::error;

/// Handler error: a storage failure rendered as a JSON body.
#[derive(Debug)]
pub struct ApiError(pub StoreError);

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let detail = self.0.to_string();
        match &self.0 {
            StoreError::Validation(e) => {
                let body = json!({
                    "error": "ValidationError",
                    "field": e.field(),
                    "detail": detail,
                });
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            StoreError::DanglingReference(_) => {
                error_response(StatusCode::UNPROCESSABLE_ENTITY, "DanglingReference", &detail)
            }
            StoreError::DuplicateSlug(_) | StoreError::DuplicateBooking { .. } => {
                error_response(StatusCode::CONFLICT, "Conflict", &detail)
            }
            StoreError::NotFound { .. } => error_response(StatusCode::NOT_FOUND, "NotFound", &detail),
            StoreError::Connection(_) => {
                error_response(StatusCode::SERVICE_UNAVAILABLE, "DatabaseUnavailable", &detail)
            }
            StoreError::Database(e) => {
                error!("Database error: {}", e);
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DatabaseError",
                    "unexpected database error",
                )
            }
        }
    }
}

/// Build error response with JSON payload
pub fn error_response(status: StatusCode, error: &str, detail: &str) -> Response {
    let body = json!({
        "error": error,
        "detail": detail,
    });
    (status, Json(body)).into_response()
}
