//! # SQLite Schema and Queries
//!
//! Centralizes the DDL for the catalog tables. Keeping the SQL here isolates
//! database-specific syntax from the store logic.

/// All table creation statements, in dependency order. Each statement is
/// idempotent, so the list is safe to run on every startup.
pub const ALL_TABLE_CREATION_SQL: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS guests (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        title TEXT NOT NULL DEFAULT '',
        company TEXT NOT NULL DEFAULT '',
        bio TEXT NOT NULL DEFAULT '',
        photo_url TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );",
    "CREATE TABLE IF NOT EXISTS episodes (
        id TEXT PRIMARY KEY,
        episode_number INTEGER NOT NULL,
        title TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        publish_date TEXT NOT NULL DEFAULT '',
        duration TEXT NOT NULL DEFAULT '',
        guest_id TEXT,
        featured_quote TEXT NOT NULL DEFAULT '',
        quote_timestamp TEXT NOT NULL DEFAULT '',
        topics TEXT NOT NULL DEFAULT '[]',
        transcript_path TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );",
    "CREATE TABLE IF NOT EXISTS transcripts (
        path TEXT PRIMARY KEY,
        content TEXT NOT NULL
    );",
    "CREATE INDEX IF NOT EXISTS idx_episodes_episode_number ON episodes (episode_number);",
];
