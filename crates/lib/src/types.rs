//! # Shared Pipeline Types
//!
//! Data structures shared across the analysis and import pipeline. Everything
//! that crosses the HTTP boundary serializes with camelCase field names, which
//! is the wire convention the admin client speaks.

use serde::{Deserialize, Serialize};

/// The per-item state machine: `Pending -> Analyzing -> {Completed | Error |
/// Skipped}`, with `Imported` reachable from `Completed` at commit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Pending,
    Analyzing,
    Completed,
    Error,
    Skipped,
    Imported,
}

/// The model's self-reported reliability tag for one extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    #[default]
    Medium,
    Low,
}

/// The structured metadata extracted from one transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub episode_number: Option<u32>,
    pub title: String,
    pub description: String,
    pub featured_quote: String,
    pub quote_timestamp: Option<String>,
    pub topics: Vec<String>,
    pub estimated_duration: String,
    pub guest_name: Option<String>,
    pub guest_title: Option<String>,
    pub guest_company: Option<String>,
    pub confidence: Confidence,
    pub warnings: Vec<String>,
}

/// One transcript submitted for analysis, plus its evolving state.
///
/// Created by intake with `status = Pending`; mutated in place by the batch
/// coordinator; consumed (not destroyed) by the import step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisItem {
    pub id: String,
    pub file_name: String,
    pub content: String,
    pub status: ItemStatus,
    pub analysis: Option<AnalysisResult>,
    pub error: Option<String>,
    pub matched_guest_id: Option<String>,
    pub create_new_guest: bool,
}

/// A guest record in the catalog. `name` is the natural de-duplication key
/// across the pipeline, compared case-insensitively.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub id: String,
    pub name: String,
    pub title: String,
    pub company: String,
    pub bio: String,
    pub photo_url: String,
}

/// Input for creating a guest record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGuestInput {
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub photo_url: String,
}

/// An episode record in the catalog. The transcript body lives in a separate
/// blob, addressed by `transcript_path`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub id: String,
    pub episode_number: u32,
    pub title: String,
    pub description: String,
    pub publish_date: String,
    pub duration: String,
    pub guest_id: Option<String>,
    pub featured_quote: String,
    pub quote_timestamp: String,
    pub topics: Vec<String>,
    pub transcript_path: String,
}

/// Input for creating an episode record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEpisodeInput {
    pub episode_number: u32,
    pub title: String,
    pub description: String,
    pub publish_date: String,
    pub duration: String,
    pub guest_id: Option<String>,
    pub featured_quote: String,
    pub quote_timestamp: String,
    pub topics: Vec<String>,
}

/// Guest fields carried alongside an import item when the reviewer chose to
/// create a new guest rather than match an existing one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGuestData {
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
}

/// One reviewer-approved item submitted for commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportItem {
    pub id: String,
    pub file_name: String,
    pub episode_number: Option<u32>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub publish_date: Option<String>,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub guest_id: Option<String>,
    #[serde(default)]
    pub create_new_guest: bool,
    #[serde(default)]
    pub new_guest_data: Option<NewGuestData>,
    #[serde(default)]
    pub featured_quote: String,
    #[serde(default)]
    pub quote_timestamp: String,
    #[serde(default)]
    pub topics: Vec<String>,
    pub transcript_content: String,
}

/// A per-item failure recorded during commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportItemError {
    pub id: String,
    pub file_name: String,
    pub error: String,
}

/// Aggregate result of one commit batch. Every eligible item lands in exactly
/// one bucket: `imported`, `skipped`, or an `errors` entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<ImportItemError>,
    pub created_episode_ids: Vec<String>,
    pub created_guest_ids: Vec<String>,
}
