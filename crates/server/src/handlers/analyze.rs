//! The bulk transcript analysis endpoint.
//!
//! `POST /admin/analyze` takes a batch of uploaded transcripts and streams
//! progress back to the client as Server-Sent Events while a background task
//! runs the items through the analyzer one by one. Dropping the connection
//! cancels the run after the item currently in flight.

use crate::{auth::AdminSession, errors::AppError, handlers::types::AnalyzeRequest, state::AppState};
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use castbook::{batch::BatchCoordinator, events::StreamEvent, intake};
use futures::Stream;
use std::{collections::HashSet, convert::Infallible};
use tokio::sync::{mpsc, watch};
use tokio_stream::{wrappers::ReceiverStream, StreamExt};
use tracing::{error, info};

/// Handles `POST /admin/analyze`.
///
/// Seeds the duplicate-skip set from the episode numbers already in the
/// catalog, then hands the batch to a spawned coordinator task. The returned
/// SSE stream is fed from the coordinator's event channel; when the client
/// disconnects, the channel closes and the coordinator stops on its own.
pub async fn analyze_handler(
    State(state): State<AppState>,
    _session: AdminSession,
    Json(payload): Json<AnalyzeRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    if payload.items.is_empty() {
        return Err(AppError::BadRequest("No items provided".to_string()));
    }

    let guests = state.store.list_guests().await?;
    let episodes = state.store.list_episodes().await?;
    let seen_episode_numbers: HashSet<u32> =
        episodes.iter().map(|e| e.episode_number).collect();

    let mut items: Vec<_> = payload
        .items
        .into_iter()
        .map(|p| {
            let mut item = intake::item_from_text(p.file_name, p.content);
            // Keep the client's id so it can correlate stream events back to
            // the row it rendered for this file.
            if let Some(id) = p.id {
                item.id = id;
            }
            item
        })
        .collect();

    info!(count = items.len(), "Starting analysis batch");

    let (event_tx, event_rx) = mpsc::channel::<StreamEvent>(32);
    let (cancel_tx, cancel_rx) = watch::channel(false);

    let coordinator = BatchCoordinator::new(state.analyzer.clone(), state.batch_config.clone());
    tokio::spawn(async move {
        // Holding the sender keeps the cancel channel alive for the whole
        // run; it is signalled implicitly when the event receiver drops.
        let _cancel_guard = cancel_tx;
        let summary = coordinator
            .run(&mut items, &guests, seen_episode_numbers, event_tx, cancel_rx)
            .await;
        info!(
            successful = summary.successful,
            failed = summary.failed,
            skipped = summary.skipped,
            cancelled = summary.cancelled,
            "Analysis batch finished"
        );
    });

    let stream = ReceiverStream::new(event_rx).map(|event| {
        let frame = match serde_json::to_string(&event) {
            Ok(json) => Event::default().data(json),
            Err(e) => {
                error!(error = %e, "Failed to serialize stream event");
                Event::default().data("{\"type\":\"item_error\",\"itemId\":\"\",\"error\":\"serialization failure\"}")
            }
        };
        Ok(frame)
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
