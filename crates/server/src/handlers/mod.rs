//! # API Route Handlers
//!
//! All Axum route handlers for the `castbook-server`, split into logical
//! sub-modules: the analysis stream, the import commit, and the catalog
//! endpoints the admin client needs around them.

pub mod admin;
pub mod analyze;
pub mod general;
pub mod import;
pub mod types;

// Re-export all handlers from the sub-modules to make them easily accessible
// to the router under a single `handlers::` path.
pub use admin::*;
pub use analyze::*;
pub use general::*;
pub use import::*;
