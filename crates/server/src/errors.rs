use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use castbook::StoreError;
use serde_json::json;
use tracing::error;

/// A custom error type for the server application.
///
/// Encapsulates the errors that can occur within a handler, allowing them to
/// be converted into appropriate HTTP responses. Per-item pipeline failures
/// never surface here; they are reported through the event stream or the
/// import outcome. This type covers batch-scope failures only.
pub enum AppError {
    /// The request itself was malformed (bad payload, empty item list).
    BadRequest(String),
    /// Errors from the catalog store.
    Store(StoreError),
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Store(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match self {
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::Store(err) => {
                error!("StoreError: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Storage error: {err}"),
                )
            }
            AppError::Internal(err) => {
                error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status_code, body).into_response()
    }
}
