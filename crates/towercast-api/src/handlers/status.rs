use axum::http::StatusCode;

/// Liveness check: 200 with an empty body
pub async fn status() -> StatusCode {
    StatusCode::OK
}
