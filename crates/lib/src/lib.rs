//! # castbook
//!
//! The core library for the castbook admin pipeline: bulk podcast transcript
//! analysis and import. It turns a pile of raw transcript files into reviewed,
//! structured episode and guest records by driving each transcript through an
//! LLM extraction call, streaming per-item progress to the caller, and finally
//! committing an approved subset into the SQLite catalog.
//!
//! The main building blocks are:
//!
//! - [`intake`]: turns raw files into pending [`types::AnalysisItem`]s.
//! - [`analyzer`]: one LLM extraction call with retry/backoff and response
//!   coercion.
//! - [`batch`]: sequential batch coordination, duplicate skipping, and event
//!   emission.
//! - [`events`]: the server -> client event stream protocol.
//! - [`importer`]: the commit step that persists approved items.
//! - [`providers`]: the AI provider trait and the SQLite catalog store.

pub mod analyzer;
pub mod batch;
pub mod constants;
pub mod errors;
pub mod events;
pub mod importer;
pub mod intake;
pub mod matcher;
pub mod prompts;
pub mod providers;
pub mod types;

pub use errors::{AnalysisError, ProviderError, StoreError};
