//! Catalog endpoints around the import pipeline: the public guest list and
//! the authenticated guest and episode management routes.

use crate::{auth::AdminSession, errors::AppError, state::AppState};
use axum::{extract::State, http::StatusCode, Json};
use castbook::types::{CreateGuestInput, Episode, Guest};

/// Handles `GET /guests`. Public: the analysis client and the published site
/// both need the roster.
pub async fn list_guests_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Guest>>, AppError> {
    let guests = state.store.list_guests().await?;
    Ok(Json(guests))
}

/// Handles `POST /admin/guests`.
pub async fn create_guest_handler(
    State(state): State<AppState>,
    _session: AdminSession,
    Json(input): Json<CreateGuestInput>,
) -> Result<(StatusCode, Json<Guest>), AppError> {
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest("Guest name is required".to_string()));
    }
    let guest = state.store.create_guest(input).await?;
    Ok((StatusCode::CREATED, Json(guest)))
}

/// Handles `GET /admin/episodes`.
pub async fn list_episodes_handler(
    State(state): State<AppState>,
    _session: AdminSession,
) -> Result<Json<Vec<Episode>>, AppError> {
    let episodes = state.store.list_episodes().await?;
    Ok(Json(episodes))
}
