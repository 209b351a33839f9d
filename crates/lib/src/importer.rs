//! # Import Committer
//!
//! The final pipeline stage: persisting a reviewer-approved subset of
//! analyzed items into the catalog. State may have drifted since analysis, so
//! duplicates are re-checked here against the store's current contents, by
//! case-insensitive guest name and by episode number. Each approved item
//! lands in exactly one bucket of the [`ImportOutcome`]: imported, skipped,
//! or an error entry. A failure on one item never aborts the rest.

use crate::{
    analyzer::parse_episode_number,
    errors::StoreError,
    providers::db::sqlite::SqliteStore,
    types::{
        AnalysisItem, CreateEpisodeInput, CreateGuestInput, ImportItem, ImportItemError,
        ImportOutcome, ItemStatus, NewGuestData,
    },
};
use std::collections::HashSet;
use tracing::{error, info};

impl ImportItem {
    /// Builds the commit payload for one analyzed item, or `None` when the
    /// item is not eligible (only completed items with an analysis are).
    pub fn from_analysis(item: &AnalysisItem) -> Option<Self> {
        if item.status != ItemStatus::Completed {
            return None;
        }
        let analysis = item.analysis.as_ref()?;
        let new_guest_data = (item.create_new_guest && analysis.guest_name.is_some()).then(|| {
            NewGuestData {
                name: analysis.guest_name.clone().unwrap_or_default(),
                title: analysis.guest_title.clone().unwrap_or_default(),
                company: analysis.guest_company.clone().unwrap_or_default(),
            }
        });

        Some(Self {
            id: item.id.clone(),
            file_name: item.file_name.clone(),
            episode_number: analysis.episode_number,
            title: analysis.title.clone(),
            description: analysis.description.clone(),
            publish_date: None,
            duration: analysis.estimated_duration.clone(),
            guest_id: item.matched_guest_id.clone(),
            create_new_guest: item.create_new_guest,
            new_guest_data,
            featured_quote: analysis.featured_quote.clone(),
            quote_timestamp: analysis.quote_timestamp.clone().unwrap_or_default(),
            topics: analysis.topics.clone(),
            transcript_content: item.content.clone(),
        })
    }
}

/// Selects the eligible subset of `items` named by `selected_ids`, preserving
/// selection order. Ids that don't exist or aren't eligible are ignored.
pub fn select_eligible(items: &[AnalysisItem], selected_ids: &[String]) -> Vec<ImportItem> {
    selected_ids
        .iter()
        .filter_map(|id| items.iter().find(|item| &item.id == id))
        .filter_map(ImportItem::from_analysis)
        .collect()
}

/// Commits approved items into the catalog, left to right.
///
/// Returns an error only for batch-scope store failures while seeding the
/// duplicate sets; per-item failures are recorded in the outcome.
pub async fn commit_import(
    store: &SqliteStore,
    items: &[ImportItem],
) -> Result<ImportOutcome, StoreError> {
    let guests = store.list_guests().await?;
    let episodes = store.list_episodes().await?;

    let mut max_episode_number = episodes
        .iter()
        .map(|episode| episode.episode_number)
        .max()
        .unwrap_or(0);
    // A guest name counts as "seen" when some episode already features that
    // guest; a guest record alone does not block a first episode.
    let mut seen_guest_names: HashSet<String> = episodes
        .iter()
        .filter_map(|episode| episode.guest_id.as_ref())
        .filter_map(|guest_id| guests.iter().find(|guest| &guest.id == guest_id))
        .map(|guest| guest.name.to_lowercase())
        .collect();
    let mut seen_episode_numbers: HashSet<u32> = episodes
        .iter()
        .map(|episode| episode.episode_number)
        .collect();

    let mut outcome = ImportOutcome::default();

    for item in items {
        // Resolve the guest name for duplicate checking, either from the
        // pending new-guest data or from the matched existing record.
        let guest_name = match (&item.new_guest_data, &item.guest_id) {
            (Some(new_guest), _) => Some(new_guest.name.clone()),
            (None, Some(guest_id)) => guests
                .iter()
                .find(|guest| &guest.id == guest_id)
                .map(|guest| guest.name.clone()),
            (None, None) => None,
        };

        // Duplicate re-check against current state plus earlier items in
        // this same commit. Skips are a first-class outcome, not errors.
        if let Some(name) = &guest_name {
            if seen_guest_names.contains(&name.to_lowercase()) {
                info!(file = %item.file_name, guest = %name, "Skipping duplicate guest at commit");
                outcome.skipped += 1;
                continue;
            }
        }
        let episode_key = item
            .episode_number
            .or_else(|| parse_episode_number(&item.file_name));
        if let Some(number) = episode_key {
            if seen_episode_numbers.contains(&number) {
                info!(file = %item.file_name, episode_number = number, "Skipping duplicate episode at commit");
                outcome.skipped += 1;
                continue;
            }
        }

        if item.title.trim().is_empty() {
            outcome.errors.push(ImportItemError {
                id: item.id.clone(),
                file_name: item.file_name.clone(),
                error: "Title is required".to_string(),
            });
            continue;
        }

        match commit_one(store, item, &mut max_episode_number, &mut outcome).await {
            Ok(episode_number) => {
                outcome.imported += 1;
                seen_episode_numbers.insert(episode_number);
                if let Some(name) = guest_name {
                    seen_guest_names.insert(name.to_lowercase());
                }
            }
            Err(err) => {
                error!(file = %item.file_name, "Import failed: {err}");
                outcome.errors.push(ImportItemError {
                    id: item.id.clone(),
                    file_name: item.file_name.clone(),
                    error: err.to_string(),
                });
            }
        }
    }

    info!(
        imported = outcome.imported,
        skipped = outcome.skipped,
        errors = outcome.errors.len(),
        "Import commit finished"
    );
    Ok(outcome)
}

/// Persists one item: the new guest first when requested, then the episode
/// with its transcript blob. Returns the episode number used.
async fn commit_one(
    store: &SqliteStore,
    item: &ImportItem,
    max_episode_number: &mut u32,
    outcome: &mut ImportOutcome,
) -> Result<u32, StoreError> {
    let mut guest_id = item.guest_id.clone();

    if item.create_new_guest {
        if let Some(new_guest) = &item.new_guest_data {
            // Bio and photo are left empty for an editor to fill in later.
            let guest = store
                .create_guest(CreateGuestInput {
                    name: new_guest.name.clone(),
                    title: new_guest.title.clone(),
                    company: new_guest.company.clone(),
                    bio: String::new(),
                    photo_url: String::new(),
                })
                .await?;
            outcome.created_guest_ids.push(guest.id.clone());
            guest_id = Some(guest.id);
        }
    }

    let episode_number = match item.episode_number {
        Some(number) => {
            *max_episode_number = (*max_episode_number).max(number);
            number
        }
        None => {
            *max_episode_number += 1;
            *max_episode_number
        }
    };

    let publish_date = item
        .publish_date
        .clone()
        .filter(|date| !date.is_empty())
        .unwrap_or_else(|| chrono::Utc::now().date_naive().to_string());

    let episode = store
        .create_episode(
            CreateEpisodeInput {
                episode_number,
                title: item.title.clone(),
                description: item.description.clone(),
                publish_date,
                duration: item.duration.clone(),
                guest_id,
                featured_quote: item.featured_quote.clone(),
                quote_timestamp: item.quote_timestamp.clone(),
                topics: item.topics.clone(),
            },
            &item.transcript_content,
        )
        .await?;
    outcome.created_episode_ids.push(episode.id);

    Ok(episode_number)
}
