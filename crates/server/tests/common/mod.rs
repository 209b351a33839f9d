//! # Common Test Utilities
//!
//! Shared harness for the `castbook-server` integration tests. `TestApp`
//! spawns a real server on a random port, backed by a temporary SQLite
//! database and an `httpmock` stand-in for the Anthropic Messages API.

// Allow unused code because this is a test utility module, and not all
// helpers are used by every test file that includes it.
#![allow(unused)]

use anyhow::Result;
use axum::serve;
use castbook_server::{
    config::AppConfig,
    router,
    state::{build_app_state, AppState},
};
use httpmock::MockServer;
use reqwest::Client;
use serde_json::json;
use std::{net::SocketAddr, path::PathBuf};
use tempfile::NamedTempFile;
use tokio::{net::TcpListener, task::JoinHandle};

/// The admin session token every test server is configured with.
pub const TEST_ADMIN_TOKEN: &str = "test-admin-token";

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    pub db_path: PathBuf,
    pub app_state: AppState,
    _db_file: NamedTempFile,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the application server and returns a `TestApp` instance.
    pub async fn spawn() -> Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let mock_server = MockServer::start();
        let db_file = NamedTempFile::new()?;
        let db_path = db_file.path().to_path_buf();

        let config = AppConfig {
            port: 0,
            db_url: db_path.to_string_lossy().to_string(),
            admin_token: TEST_ADMIN_TOKEN.to_string(),
            anthropic_api_key: "test-api-key".to_string(),
            anthropic_api_url: mock_server.url("/v1/messages"),
            model_name: "mock-analysis-model".to_string(),
            max_retries: 1,
            initial_backoff_ms: 10,
            item_delay_ms: 0,
        };

        let app_state = build_app_state(config).await?;
        let app_state_for_harness = app_state.clone();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let server_handle = tokio::spawn(async move {
            let app = router::create_router(app_state);
            let server = serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            db_path,
            app_state: app_state_for_harness,
            _db_file: db_file,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// A GET request builder with the admin bearer token already attached.
    pub fn admin_get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}{}", self.address, path))
            .bearer_auth(TEST_ADMIN_TOKEN)
    }

    /// A POST request builder with the admin bearer token already attached.
    pub fn admin_post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .post(format!("{}{}", self.address, path))
            .bearer_auth(TEST_ADMIN_TOKEN)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Builds an Anthropic Messages API response body whose single text block
/// carries the given analysis JSON.
pub fn messages_api_body(analysis_json: &serde_json::Value) -> serde_json::Value {
    json!({
        "id": "msg_test",
        "type": "message",
        "role": "assistant",
        "model": "mock-analysis-model",
        "content": [
            { "type": "text", "text": analysis_json.to_string() }
        ],
        "stop_reason": "end_turn"
    })
}

/// A well-formed analysis result for a transcript, as the model would return.
pub fn sample_analysis(title: &str, episode_number: u32, guest_name: &str) -> serde_json::Value {
    json!({
        "title": title,
        "description": format!("A conversation about {title}."),
        "guestName": guest_name,
        "guestTitle": "CEO",
        "guestCompany": "Acme",
        "episodeNumber": episode_number,
        "estimatedDuration": "1h 12m",
        "topics": ["Product", "Strategy"],
        "featuredQuote": "Build what matters.",
        "quoteTimestamp": "00:14:02",
        "matchedGuestId": null,
        "confidence": "high"
    })
}
