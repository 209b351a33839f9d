//! # Batch Coordinator
//!
//! Drives the analyzer across a whole batch of items, strictly one at a time.
//! Sequential processing with a fixed pause between items trades wall-clock
//! time for staying under the AI provider's rate limits.
//!
//! Before spending an LLM call on an item, the coordinator derives an episode
//! number from the filename and skips the item when that key was already seen,
//! either in the persisted catalog or earlier in the same batch. A failure on
//! one item never halts the batch; the error is recorded on the item and the
//! run moves on. Cancellation is cooperative and takes effect between items.

use crate::{
    analyzer::{parse_episode_number, Analyzed, Analyzer},
    constants::DEFAULT_ITEM_DELAY_MS,
    events::StreamEvent,
    types::{AnalysisItem, Guest, ItemStatus},
};
use std::collections::HashSet;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{error, info};

/// Pacing configuration for a batch run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Pause between consecutive items. Not applied after the final item.
    pub item_delay: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            item_delay: Duration::from_millis(DEFAULT_ITEM_DELAY_MS),
        }
    }
}

/// What happened over one batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub successful: usize,
    pub failed: usize,
    pub skipped: usize,
    /// True when the run stopped early, either through the cancellation flag
    /// or because the event receiver went away.
    pub cancelled: bool,
}

/// Coordinates sequential analysis of a batch of items.
#[derive(Debug, Clone)]
pub struct BatchCoordinator {
    analyzer: Analyzer,
    config: BatchConfig,
}

impl BatchCoordinator {
    pub fn new(analyzer: Analyzer, config: BatchConfig) -> Self {
        Self { analyzer, config }
    }

    /// Runs the batch, mutating each item in place as it progresses and
    /// pushing [`StreamEvent`]s to `events` in submission order.
    ///
    /// `seen_episode_numbers` seeds the duplicate-skip set, normally with the
    /// episode numbers already in the catalog; the set grows with each newly
    /// analyzed item's derived number. The batch is the only writer, so no
    /// locking is needed.
    pub async fn run(
        &self,
        items: &mut [AnalysisItem],
        guests: &[Guest],
        seen_episode_numbers: HashSet<u32>,
        events: mpsc::Sender<StreamEvent>,
        cancel: watch::Receiver<bool>,
    ) -> BatchSummary {
        let total = items.len();
        let mut seen = seen_episode_numbers;
        let mut summary = BatchSummary::default();

        for (index, item) in items.iter_mut().enumerate() {
            if *cancel.borrow() {
                info!(processed = index, total, "Batch cancelled, stopping");
                summary.cancelled = true;
                break;
            }

            let progress = StreamEvent::Progress {
                current: index + 1,
                total,
                file_name: item.file_name.clone(),
            };
            if events.send(progress).await.is_err() {
                // The listener is gone; there is nobody left to report to.
                info!(processed = index, total, "Event receiver dropped, stopping batch");
                summary.cancelled = true;
                break;
            }
            item.status = ItemStatus::Analyzing;

            // Duplicate check before spending an LLM call.
            if let Some(number) = parse_episode_number(&item.file_name) {
                if seen.contains(&number) {
                    let reason = format!("Episode {number} already exists");
                    info!(file = %item.file_name, episode_number = number, "Skipping duplicate");
                    item.status = ItemStatus::Skipped;
                    item.error = Some(reason.clone());
                    summary.skipped += 1;
                    let _ = events
                        .send(StreamEvent::ItemSkipped {
                            item_id: item.id.clone(),
                            reason,
                            episode_number: number,
                        })
                        .await;
                    self.pause_between_items(index, total).await;
                    continue;
                }
            }

            match self
                .analyzer
                .analyze(&item.file_name, &item.content, guests)
                .await
            {
                Ok(Analyzed {
                    analysis,
                    matched_guest_id,
                }) => {
                    if let Some(number) = analysis.episode_number {
                        seen.insert(number);
                    }
                    // The pre-call duplicate check keys on the filename, so a
                    // resubmission of the same file must hit even when the
                    // model reported a different episode number.
                    if let Some(number) = parse_episode_number(&item.file_name) {
                        seen.insert(number);
                    }
                    item.create_new_guest =
                        matched_guest_id.is_none() && analysis.guest_name.is_some();
                    item.matched_guest_id = matched_guest_id.clone();
                    item.analysis = Some(analysis.clone());
                    item.status = ItemStatus::Completed;
                    item.error = None;
                    summary.successful += 1;
                    let _ = events
                        .send(StreamEvent::ItemComplete {
                            item_id: item.id.clone(),
                            analysis,
                            matched_guest_id,
                        })
                        .await;
                }
                Err(err) => {
                    let message = err.to_string();
                    error!(file = %item.file_name, "Analysis failed: {message}");
                    item.status = ItemStatus::Error;
                    item.error = Some(message.clone());
                    summary.failed += 1;
                    let _ = events
                        .send(StreamEvent::ItemError {
                            item_id: item.id.clone(),
                            error: message,
                        })
                        .await;
                }
            }

            self.pause_between_items(index, total).await;
        }

        let _ = events
            .send(StreamEvent::AllComplete {
                successful: summary.successful,
                failed: summary.failed,
                skipped: summary.skipped,
            })
            .await;
        summary
    }

    async fn pause_between_items(&self, index: usize, total: usize) {
        if index + 1 < total && !self.config.item_delay.is_zero() {
            tokio::time::sleep(self.config.item_delay).await;
        }
    }
}
