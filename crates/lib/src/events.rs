//! # Analysis Event Stream Protocol
//!
//! The server reports batch progress over a single long-lived response as a
//! sequence of discriminated events, one SSE frame (`data: <json>\n\n`) per
//! logical occurrence. For every item the order is `progress` followed by
//! exactly one terminal event; `all_complete` is always last.
//!
//! [`EventStreamDecoder`] is the consuming side: it buffers transport chunks
//! until a full frame is available, so events split across chunk boundaries
//! decode correctly.

use crate::types::AnalysisResult;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One event in the analysis stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Emitted immediately before an item is analyzed or evaluated for skip.
    #[serde(rename_all = "camelCase")]
    Progress {
        current: usize,
        total: usize,
        file_name: String,
    },
    /// Emitted on successful analysis of one item.
    #[serde(rename_all = "camelCase")]
    ItemComplete {
        item_id: String,
        analysis: AnalysisResult,
        matched_guest_id: Option<String>,
    },
    /// Emitted on unrecoverable per-item failure.
    #[serde(rename_all = "camelCase")]
    ItemError { item_id: String, error: String },
    /// Emitted when the duplicate-skip rule fires for an item.
    #[serde(rename_all = "camelCase")]
    ItemSkipped {
        item_id: String,
        reason: String,
        episode_number: u32,
    },
    /// Emitted exactly once, last, after every item reached a terminal state.
    #[serde(rename_all = "camelCase")]
    AllComplete {
        successful: usize,
        failed: usize,
        skipped: usize,
    },
}

impl StreamEvent {
    /// Encodes this event as a complete SSE frame.
    pub fn to_sse_frame(&self) -> Result<String, serde_json::Error> {
        Ok(format!("data: {}\n\n", serde_json::to_string(self)?))
    }
}

/// A buffering decoder for the analysis event stream.
///
/// Feed it raw transport chunks as they arrive; it returns every event whose
/// frame has fully arrived and keeps the partial tail buffered. Non-data SSE
/// lines (comments, keep-alives) are ignored.
#[derive(Debug, Default)]
pub struct EventStreamDecoder {
    buffer: String,
}

impl EventStreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a chunk and drains all completely-received events.
    pub fn push_chunk(&mut self, chunk: &str) -> Vec<StreamEvent> {
        self.buffer.push_str(chunk);

        let mut events = Vec::new();
        while let Some(boundary) = self.buffer.find("\n\n") {
            let frame: String = self.buffer.drain(..boundary + 2).collect();
            for line in frame.lines() {
                let Some(data) = line.strip_prefix("data: ") else {
                    continue;
                };
                match serde_json::from_str(data) {
                    Ok(event) => events.push(event),
                    Err(err) => warn!("Discarding undecodable stream event: {err}"),
                }
            }
        }
        events
    }
}
