//! # Application Configuration
//!
//! Configuration for the `castbook-server`, loaded from environment variables
//! (optionally via a `.env` file). Only the admin token and the Anthropic API
//! key are required; everything else has a sensible default.

use castbook::constants::{
    DEFAULT_INITIAL_BACKOFF_MS, DEFAULT_ITEM_DELAY_MS, DEFAULT_MAX_RETRIES,
};
use config::{Config as ConfigBuilder, Environment};
use serde::Deserialize;

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate, including
    /// missing required settings.
    General(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The server configuration, loaded from the environment.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. `PORT` env var.
    #[serde(default = "default_port")]
    pub port: u16,
    /// The path to the SQLite database file. `DB_URL` env var.
    #[serde(default = "default_db_url")]
    pub db_url: String,
    /// The bearer token required on privileged admin endpoints.
    /// `ADMIN_TOKEN` env var.
    pub admin_token: String,
    /// The Anthropic API key. `ANTHROPIC_API_KEY` env var.
    pub anthropic_api_key: String,
    /// The Messages API endpoint. Overridable for testing against a mock.
    #[serde(default = "default_anthropic_api_url")]
    pub anthropic_api_url: String,
    /// The model used for transcript analysis.
    #[serde(default = "default_model_name")]
    pub model_name: String,
    /// Retries after the initial attempt for throttled analysis calls.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Initial retry backoff in milliseconds; doubles per retry.
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    /// Pause between consecutive batch items in milliseconds.
    #[serde(default = "default_item_delay_ms")]
    pub item_delay_ms: u64,
}

fn default_port() -> u16 {
    9090
}

fn default_db_url() -> String {
    "castbook.db".to_string()
}

fn default_anthropic_api_url() -> String {
    "https://api.anthropic.com/v1/messages".to_string()
}

fn default_model_name() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_initial_backoff_ms() -> u64 {
    DEFAULT_INITIAL_BACKOFF_MS
}

fn default_item_delay_ms() -> u64 {
    DEFAULT_ITEM_DELAY_MS
}

/// Loads the configuration from the environment.
pub fn get_config() -> Result<AppConfig, ConfigError> {
    let settings = ConfigBuilder::builder()
        .add_source(Environment::default())
        .build()?;
    Ok(settings.try_deserialize::<AppConfig>()?)
}
