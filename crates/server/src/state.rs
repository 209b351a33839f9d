//! # Application State
//!
//! The shared application state (`AppState`) and the logic for building it at
//! startup: the configuration, the SQLite catalog store, and a ready-to-use
//! transcript analyzer wired to the configured AI provider.

use crate::config::AppConfig;
use castbook::{
    analyzer::{Analyzer, RetryPolicy},
    batch::BatchConfig,
    providers::{ai::anthropic::AnthropicProvider, db::sqlite::SqliteStore},
};
use std::{sync::Arc, time::Duration};

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration, loaded from the environment.
    pub config: Arc<AppConfig>,
    /// The SQLite catalog store for guests, episodes, and transcripts.
    pub store: Arc<SqliteStore>,
    /// The transcript analyzer, sharing one provider client across requests.
    pub analyzer: Analyzer,
    /// Pacing for batch analysis runs.
    pub batch_config: BatchConfig,
}

/// Builds the shared application state from the configuration.
///
/// Instantiates the AI provider client, opens the SQLite database, and
/// ensures the catalog schema exists.
pub async fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let provider = AnthropicProvider::new(
        config.anthropic_api_url.clone(),
        config.anthropic_api_key.clone(),
        config.model_name.clone(),
    )?;
    let analyzer = Analyzer::new(
        Box::new(provider),
        RetryPolicy {
            max_retries: config.max_retries,
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
        },
    );
    let batch_config = BatchConfig {
        item_delay: Duration::from_millis(config.item_delay_ms),
    };

    let store = SqliteStore::new(&config.db_url).await?;
    store.initialize_schema().await?;

    Ok(AppState {
        config: Arc::new(config),
        store: Arc::new(store),
        analyzer,
        batch_config,
    })
}
