//! # File Intake
//!
//! Turns user-provided raw files into pending analysis items, the origin of
//! all downstream pipeline data. Files that don't carry the accepted
//! transcript extension, or that fail to read, are skipped with a warning
//! rather than failing the batch. No de-duplication happens here; that is the
//! batch coordinator's and committer's job.

use crate::types::{AnalysisItem, ItemStatus};
use std::ffi::OsStr;
use std::path::Path;
use tracing::warn;
use uuid::Uuid;

/// The only file extension accepted for transcripts.
pub const TRANSCRIPT_EXTENSION: &str = "txt";

/// Builds a pending analysis item from already-read transcript text. This is
/// the entry point used by the HTTP surface, where the client uploads file
/// contents in the request body.
pub fn item_from_text(file_name: impl Into<String>, content: impl Into<String>) -> AnalysisItem {
    AnalysisItem {
        id: Uuid::new_v4().to_string(),
        file_name: file_name.into(),
        content: content.into(),
        status: ItemStatus::Pending,
        analysis: None,
        error: None,
        matched_guest_id: None,
        create_new_guest: false,
    }
}

/// Reads a set of transcript files into pending analysis items.
///
/// Files without the `.txt` extension and files that cannot be read are
/// logged and excluded from the result.
pub async fn read_transcript_files(paths: &[impl AsRef<Path>]) -> Vec<AnalysisItem> {
    let mut items = Vec::new();
    for path in paths {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let is_transcript = path
            .extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| ext.eq_ignore_ascii_case(TRANSCRIPT_EXTENSION));
        if !is_transcript {
            warn!(file = %file_name, "Skipping file without .{TRANSCRIPT_EXTENSION} extension");
            continue;
        }

        match tokio::fs::read_to_string(path).await {
            Ok(content) => items.push(item_from_text(file_name, content)),
            Err(err) => {
                warn!(file = %file_name, "Failed to read transcript file: {err}");
            }
        }
    }
    items
}
