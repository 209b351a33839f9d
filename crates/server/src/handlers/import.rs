//! The import commit endpoint.
//!
//! `POST /admin/import` takes the reviewed analysis results the operator
//! selected and writes them into the catalog, creating guests where the
//! analysis proposed new ones and de-duplicating against what is already
//! stored.

use crate::{auth::AdminSession, errors::AppError, handlers::types::ImportRequest, state::AppState};
use axum::{extract::State, Json};
use castbook::{importer::commit_import, types::ImportOutcome};
use tracing::info;

/// Handles `POST /admin/import`.
pub async fn import_handler(
    State(state): State<AppState>,
    _session: AdminSession,
    Json(payload): Json<ImportRequest>,
) -> Result<Json<ImportOutcome>, AppError> {
    if payload.items.is_empty() {
        return Err(AppError::BadRequest("No items provided".to_string()));
    }

    let outcome = commit_import(&state.store, &payload.items).await?;
    info!(
        imported = outcome.imported,
        skipped = outcome.skipped,
        errors = outcome.errors.len(),
        "Import finished"
    );
    Ok(Json(outcome))
}
