//! # Admin Authentication
//!
//! The admin endpoints are protected by a single shared session token,
//! presented as `Authorization: Bearer <token>`. The [`AdminSession`]
//! extractor rejects any privileged request without a valid token before the
//! handler does per-item work. Guest-listing reads stay unauthenticated and
//! simply don't use the extractor.

use crate::state::AppState;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use serde_json::json;
use tracing::warn;

/// Proof that the request carried a valid admin session token.
#[derive(Debug, Clone, Copy)]
pub struct AdminSession;

/// A custom rejection type for authentication failures, turned into a JSON
/// error response by Axum.
pub struct AuthError(StatusCode, String);

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.0, Json(json!({ "error": self.1 }))).into_response()
    }
}

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let bearer_header =
            Option::<TypedHeader<Authorization<Bearer>>>::from_request_parts(parts, state)
                .await
                .map_err(|e| {
                    warn!("Unexpected error during header extraction: {}", e);
                    AuthError(
                        StatusCode::BAD_REQUEST,
                        "Invalid Authorization header format.".to_string(),
                    )
                })?;

        let Some(TypedHeader(Authorization(bearer))) = bearer_header else {
            return Err(AuthError(
                StatusCode::UNAUTHORIZED,
                "Unauthorized".to_string(),
            ));
        };

        if bearer.token() != state.config.admin_token {
            warn!("Rejected admin request with invalid session token");
            return Err(AuthError(
                StatusCode::UNAUTHORIZED,
                "Unauthorized".to_string(),
            ));
        }

        Ok(AdminSession)
    }
}
