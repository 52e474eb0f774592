use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;

pub async fn default_handler() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"error": "not_found", "message": "unknown route"})),
    )
}
