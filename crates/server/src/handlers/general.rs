//! General-purpose handlers for the root and health-check endpoints.

use axum::response::IntoResponse;

/// A simple handler for the root path to confirm the server is running.
pub async fn root() -> &'static str {
    "castbook server is running"
}

/// Handler for the `/health` endpoint, used by deployment probes.
pub async fn health_check() -> impl IntoResponse {
    (axum::http::StatusCode::OK, "OK")
}
