//! Request payload types shared by the route handlers.

use castbook::types::ImportItem;
use serde::Deserialize;

/// One uploaded transcript in an analysis request. The client reads the file
/// and ships its name and full text; the server never touches the client's
/// filesystem.
///
/// The client assigns each item an id when the file is selected and uses it
/// to correlate stream events back to its rows, so the id must survive the
/// round trip unchanged. One is generated server-side only when absent.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeItemPayload {
    #[serde(default)]
    pub id: Option<String>,
    pub file_name: String,
    pub content: String,
}

/// The request body for `POST /admin/analyze`.
#[derive(Deserialize, Debug)]
pub struct AnalyzeRequest {
    pub items: Vec<AnalyzeItemPayload>,
}

/// The request body for `POST /admin/import`: the reviewed analysis results
/// the operator chose to commit.
#[derive(Deserialize, Debug)]
pub struct ImportRequest {
    pub items: Vec<ImportItem>,
}
