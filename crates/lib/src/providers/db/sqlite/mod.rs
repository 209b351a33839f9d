//! # SQLite Catalog Store
//!
//! The persistent store behind the import pipeline: guest and episode
//! collections plus a transcript blob table keyed by a derived path. Built on
//! Turso; each operation takes a fresh connection from the shared `Database`.

use crate::{
    errors::StoreError,
    types::{CreateEpisodeInput, CreateGuestInput, Episode, Guest},
};
use std::fmt::{self, Debug};
use tracing::debug;
use turso::{params, Connection, Database, Value as TursoValue};
use uuid::Uuid;

mod sql;

/// A store for the episode/guest catalog backed by a local SQLite database.
///
/// Cloning shares the same underlying database, allowing concurrent access to
/// the same file or in-memory instance.
#[derive(Clone)]
pub struct SqliteStore {
    /// The Turso database instance. Cloneable and thread-safe.
    pub db: Database,
}

impl SqliteStore {
    /// Creates a new `SqliteStore` from a file path, or ":memory:" for an
    /// isolated in-memory database.
    pub async fn new(db_path: &str) -> Result<Self, StoreError> {
        let db = turso::Builder::new_local(db_path)
            .build()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        // WAL improves concurrency for file-backed databases and is a no-op
        // for in-memory ones. PRAGMA returns a row, so `query` is required.
        let conn = db
            .connect()
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        conn.query("PRAGMA journal_mode=WAL;", ())
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(Self { db })
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        self.db
            .connect()
            .map_err(|e| StoreError::Connection(e.to_string()))
    }

    /// Ensures that all catalog tables and indexes exist. Idempotent and safe
    /// to call on every startup.
    pub async fn initialize_schema(&self) -> Result<(), StoreError> {
        let conn = self.connect()?;
        for statement in sql::ALL_TABLE_CREATION_SQL {
            conn.execute(statement, ())
                .await
                .map_err(|e| StoreError::OperationFailed(e.to_string()))?;
        }
        Ok(())
    }

    // --- Guest operations ---

    pub async fn list_guests(&self) -> Result<Vec<Guest>, StoreError> {
        let conn = self.connect()?;
        let mut rows = conn
            .query(
                "SELECT id, name, title, company, bio, photo_url FROM guests ORDER BY name ASC",
                (),
            )
            .await
            .map_err(|e| StoreError::OperationFailed(e.to_string()))?;

        let mut guests = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| StoreError::OperationFailed(e.to_string()))?
        {
            guests.push(Guest {
                id: row_text(&row, 0)?,
                name: row_text(&row, 1)?,
                title: row_text(&row, 2)?,
                company: row_text(&row, 3)?,
                bio: row_text(&row, 4)?,
                photo_url: row_text(&row, 5)?,
            });
        }
        Ok(guests)
    }

    pub async fn get_guest(&self, id: &str) -> Result<Option<Guest>, StoreError> {
        let conn = self.connect()?;
        let mut rows = conn
            .query(
                "SELECT id, name, title, company, bio, photo_url FROM guests WHERE id = ?1",
                params![id.to_string()],
            )
            .await
            .map_err(|e| StoreError::OperationFailed(e.to_string()))?;

        let Some(row) = rows
            .next()
            .await
            .map_err(|e| StoreError::OperationFailed(e.to_string()))?
        else {
            return Ok(None);
        };
        Ok(Some(Guest {
            id: row_text(&row, 0)?,
            name: row_text(&row, 1)?,
            title: row_text(&row, 2)?,
            company: row_text(&row, 3)?,
            bio: row_text(&row, 4)?,
            photo_url: row_text(&row, 5)?,
        }))
    }

    pub async fn create_guest(&self, input: CreateGuestInput) -> Result<Guest, StoreError> {
        let conn = self.connect()?;
        let id = Uuid::new_v4().to_string();
        debug!(guest_id = %id, name = %input.name, "Creating guest record");
        conn.execute(
            "INSERT INTO guests (id, name, title, company, bio, photo_url)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                id.clone(),
                input.name.clone(),
                input.title.clone(),
                input.company.clone(),
                input.bio.clone(),
                input.photo_url.clone()
            ],
        )
        .await
        .map_err(|e| StoreError::OperationFailed(e.to_string()))?;

        Ok(Guest {
            id,
            name: input.name,
            title: input.title,
            company: input.company,
            bio: input.bio,
            photo_url: input.photo_url,
        })
    }

    // --- Episode operations ---

    pub async fn list_episodes(&self) -> Result<Vec<Episode>, StoreError> {
        let conn = self.connect()?;
        let mut rows = conn
            .query(
                "SELECT id, episode_number, title, description, publish_date, duration,
                        guest_id, featured_quote, quote_timestamp, topics, transcript_path
                 FROM episodes ORDER BY episode_number ASC",
                (),
            )
            .await
            .map_err(|e| StoreError::OperationFailed(e.to_string()))?;

        let mut episodes = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| StoreError::OperationFailed(e.to_string()))?
        {
            episodes.push(episode_from_row(&row)?);
        }
        Ok(episodes)
    }

    /// Persists an episode together with its transcript blob. The transcript
    /// is addressed by a path derived from the episode number.
    pub async fn create_episode(
        &self,
        input: CreateEpisodeInput,
        transcript: &str,
    ) -> Result<Episode, StoreError> {
        let conn = self.connect()?;
        let id = Uuid::new_v4().to_string();
        let transcript_path = transcript_path_for(input.episode_number);
        let topics_json = serde_json::to_string(&input.topics)
            .map_err(|e| StoreError::OperationFailed(e.to_string()))?;
        debug!(episode_id = %id, episode_number = input.episode_number, "Creating episode record");

        conn.execute(
            "INSERT OR REPLACE INTO transcripts (path, content) VALUES (?1, ?2)",
            params![transcript_path.clone(), transcript.to_string()],
        )
        .await
        .map_err(|e| StoreError::OperationFailed(e.to_string()))?;

        let guest_id_value = match &input.guest_id {
            Some(guest_id) => TursoValue::Text(guest_id.clone()),
            None => TursoValue::Null,
        };
        conn.execute(
            "INSERT INTO episodes (id, episode_number, title, description, publish_date,
                                   duration, guest_id, featured_quote, quote_timestamp,
                                   topics, transcript_path)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                id.clone(),
                input.episode_number as i64,
                input.title.clone(),
                input.description.clone(),
                input.publish_date.clone(),
                input.duration.clone(),
                guest_id_value,
                input.featured_quote.clone(),
                input.quote_timestamp.clone(),
                topics_json,
                transcript_path.clone()
            ],
        )
        .await
        .map_err(|e| StoreError::OperationFailed(e.to_string()))?;

        Ok(Episode {
            id,
            episode_number: input.episode_number,
            title: input.title,
            description: input.description,
            publish_date: input.publish_date,
            duration: input.duration,
            guest_id: input.guest_id,
            featured_quote: input.featured_quote,
            quote_timestamp: input.quote_timestamp,
            topics: input.topics,
            transcript_path,
        })
    }

    /// Reads a transcript blob by its derived path.
    pub async fn read_transcript(&self, path: &str) -> Result<Option<String>, StoreError> {
        let conn = self.connect()?;
        let mut rows = conn
            .query(
                "SELECT content FROM transcripts WHERE path = ?1",
                params![path.to_string()],
            )
            .await
            .map_err(|e| StoreError::OperationFailed(e.to_string()))?;

        let Some(row) = rows
            .next()
            .await
            .map_err(|e| StoreError::OperationFailed(e.to_string()))?
        else {
            return Ok(None);
        };
        Ok(Some(row_text(&row, 0)?))
    }
}

impl Debug for SqliteStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteStore").finish_non_exhaustive()
    }
}

/// The derived blob path for an episode's transcript.
pub fn transcript_path_for(episode_number: u32) -> String {
    format!("transcripts/episode-{episode_number}.txt")
}

fn episode_from_row(row: &turso::Row) -> Result<Episode, StoreError> {
    let topics_json = row_text(row, 9)?;
    let topics: Vec<String> = serde_json::from_str(&topics_json).unwrap_or_default();
    Ok(Episode {
        id: row_text(row, 0)?,
        episode_number: row_u32(row, 1)?,
        title: row_text(row, 2)?,
        description: row_text(row, 3)?,
        publish_date: row_text(row, 4)?,
        duration: row_text(row, 5)?,
        guest_id: row_opt_text(row, 6)?,
        featured_quote: row_text(row, 7)?,
        quote_timestamp: row_text(row, 8)?,
        topics,
        transcript_path: row_text(row, 10)?,
    })
}

fn row_text(row: &turso::Row, idx: usize) -> Result<String, StoreError> {
    match row
        .get_value(idx)
        .map_err(|e| StoreError::OperationFailed(e.to_string()))?
    {
        TursoValue::Text(s) => Ok(s),
        TursoValue::Null => Ok(String::new()),
        other => Err(StoreError::OperationFailed(format!(
            "Expected text in column {idx}, got {other:?}"
        ))),
    }
}

fn row_opt_text(row: &turso::Row, idx: usize) -> Result<Option<String>, StoreError> {
    match row
        .get_value(idx)
        .map_err(|e| StoreError::OperationFailed(e.to_string()))?
    {
        TursoValue::Text(s) => Ok(Some(s)),
        TursoValue::Null => Ok(None),
        other => Err(StoreError::OperationFailed(format!(
            "Expected nullable text in column {idx}, got {other:?}"
        ))),
    }
}

fn row_u32(row: &turso::Row, idx: usize) -> Result<u32, StoreError> {
    match row
        .get_value(idx)
        .map_err(|e| StoreError::OperationFailed(e.to_string()))?
    {
        TursoValue::Integer(i) => u32::try_from(i).map_err(|_| {
            StoreError::OperationFailed(format!("Integer in column {idx} out of range: {i}"))
        }),
        other => Err(StoreError::OperationFailed(format!(
            "Expected integer in column {idx}, got {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_store() -> SqliteStore {
        let store = SqliteStore::new(":memory:").await.unwrap();
        store.initialize_schema().await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_guest_roundtrip() {
        let store = memory_store().await;
        let created = store
            .create_guest(CreateGuestInput {
                name: "Julie Zhuo".to_string(),
                title: "Co-founder".to_string(),
                company: "Sundial".to_string(),
                bio: String::new(),
                photo_url: String::new(),
            })
            .await
            .unwrap();

        let listed = store.list_guests().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Julie Zhuo");

        let fetched = store.get_guest(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.company, "Sundial");
        assert!(store.get_guest("no-such-id").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_episode_with_transcript_roundtrip() {
        let store = memory_store().await;
        let episode = store
            .create_episode(
                CreateEpisodeInput {
                    episode_number: 42,
                    title: "Building product sense".to_string(),
                    description: "A conversation about product craft.".to_string(),
                    publish_date: "2026-01-15".to_string(),
                    duration: "1h 5m".to_string(),
                    guest_id: None,
                    featured_quote: "Taste is built, not born.".to_string(),
                    quote_timestamp: String::new(),
                    topics: vec!["Product".to_string(), "Design".to_string()],
                },
                "Welcome to the show...",
            )
            .await
            .unwrap();

        assert_eq!(episode.transcript_path, "transcripts/episode-42.txt");

        let episodes = store.list_episodes().await.unwrap();
        assert_eq!(episodes.len(), 1);
        assert_eq!(episodes[0].episode_number, 42);
        assert_eq!(episodes[0].guest_id, None);
        assert_eq!(episodes[0].topics, vec!["Product", "Design"]);

        let transcript = store
            .read_transcript(&episode.transcript_path)
            .await
            .unwrap();
        assert_eq!(transcript.as_deref(), Some("Welcome to the show..."));
    }
}
