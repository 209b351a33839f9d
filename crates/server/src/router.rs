use super::{handlers, state::AppState};
use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Transcript batches can carry dozens of full episode texts, so the
/// analysis and import routes take up to 50 MB bodies.
const TRANSCRIPT_BODY_LIMIT: usize = 50 * 1024 * 1024;

/// Creates the Axum router with all the application routes.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/guests", get(handlers::list_guests_handler))
        .route(
            "/admin/analyze",
            post(handlers::analyze_handler).layer(DefaultBodyLimit::max(TRANSCRIPT_BODY_LIMIT)),
        )
        .route(
            "/admin/import",
            post(handlers::import_handler).layer(DefaultBodyLimit::max(TRANSCRIPT_BODY_LIMIT)),
        )
        .route("/admin/guests", post(handlers::create_guest_handler))
        .route("/admin/episodes", get(handlers::list_episodes_handler))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}
