//! Local SQLite-backed key-value store for the quote collection.
//!
//! The collection is mirrored into the `kv` table as a JSON-encoded
//! array under a fixed key after every mutation; sync bookkeeping
//! lives in a single-row `sync_state` table.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::{seed_quotes, AppError, Quote, Result, SyncState};

/// Key under which the serialized collection is stored.
const QUOTES_KEY: &str = "quotes";

/// Key under which the last selected category filter is stored.
const SELECTED_CATEGORY_KEY: &str = "selectedCategory";

/// Local storage repository using SQLite.
pub struct QuoteStore {
    conn: Connection,
}

impl QuoteStore {
    /// Opens or creates the local store database.
    ///
    /// # Errors
    /// Returns error if database cannot be opened or schema creation fails.
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::io("Failed to create storage directory", e))?;
        }

        let conn = Connection::open(path).map_err(AppError::storage)?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(AppError::storage)?;

        let store = Self { conn };
        store.init_schema()?;

        Ok(store)
    }

    /// Initialize database schema.
    fn init_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(
                r"
            -- Generic key-value table; quotes live here as JSON
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            -- Sync state table
            CREATE TABLE IF NOT EXISTS sync_state (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                last_sync TEXT,
                quote_count INTEGER NOT NULL DEFAULT 0,
                is_syncing INTEGER NOT NULL DEFAULT 0,
                sync_started TEXT,
                last_error TEXT
            );

            -- Initialize sync state if not exists
            INSERT OR IGNORE INTO sync_state (id) VALUES (1);
            ",
            )
            .map_err(AppError::storage)?;

        Ok(())
    }

    /// Read a raw value from the kv table.
    fn get_value(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(AppError::storage)
    }

    /// Write a raw value to the kv table, overwriting prior content.
    fn set_value(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .map_err(AppError::storage)?;

        Ok(())
    }

    /// Load the quote collection.
    ///
    /// Falls back to the built-in seed when the key is missing or the
    /// stored value does not decode; never raises to the caller.
    #[must_use]
    pub fn load_quotes(&self) -> Vec<Quote> {
        match self.get_value(QUOTES_KEY) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(quotes) => quotes,
                Err(e) => {
                    tracing::warn!(error = %e, "Stored collection is corrupt, using seed");
                    seed_quotes()
                }
            },
            Ok(None) => seed_quotes(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored collection, using seed");
                seed_quotes()
            }
        }
    }

    /// Persist the full collection, overwriting prior content.
    ///
    /// # Errors
    /// Returns error if serialization or the write fails.
    pub fn save_quotes(&self, quotes: &[Quote]) -> Result<()> {
        let raw = serde_json::to_string(quotes).map_err(AppError::json_parse)?;
        self.set_value(QUOTES_KEY, &raw)
    }

    /// Get the persisted category selection, if any.
    ///
    /// # Errors
    /// Returns error if the store cannot be read.
    pub fn selected_category(&self) -> Result<Option<String>> {
        self.get_value(SELECTED_CATEGORY_KEY)
    }

    /// Persist the category selection.
    ///
    /// # Errors
    /// Returns error if the write fails.
    pub fn set_selected_category(&self, category: &str) -> Result<()> {
        self.set_value(SELECTED_CATEGORY_KEY, category)
    }

    /// Clear the persisted category selection.
    ///
    /// # Errors
    /// Returns error if the delete fails.
    pub fn clear_selected_category(&self) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", [SELECTED_CATEGORY_KEY])
            .map_err(AppError::storage)?;

        Ok(())
    }

    /// Get sync state.
    ///
    /// # Errors
    /// Returns error if the store cannot be read.
    pub fn get_sync_state(&self) -> Result<SyncState> {
        self.conn
            .query_row(
                r"
            SELECT last_sync, quote_count, is_syncing, sync_started, last_error
            FROM sync_state WHERE id = 1
            ",
                [],
                |row| {
                    let last_sync_str: Option<String> = row.get(0)?;
                    let last_sync = last_sync_str
                        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
                        .map(|dt| dt.with_timezone(&Utc));

                    let sync_started_str: Option<String> = row.get(3)?;
                    let sync_started = sync_started_str
                        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
                        .map(|dt| dt.with_timezone(&Utc));

                    Ok(SyncState {
                        last_sync,
                        quote_count: row.get::<_, i64>(1)? as usize,
                        is_syncing: row.get::<_, i32>(2)? != 0,
                        sync_started,
                        last_error: row.get(4)?,
                    })
                },
            )
            .map_err(AppError::storage)
    }

    /// Update sync state.
    ///
    /// # Errors
    /// Returns error if the write fails.
    pub fn update_sync_state(&self, state: &SyncState) -> Result<()> {
        self.conn
            .execute(
                r"
            UPDATE sync_state SET
                last_sync = ?1,
                quote_count = ?2,
                is_syncing = ?3,
                sync_started = ?4,
                last_error = ?5
            WHERE id = 1
            ",
                params![
                    state.last_sync.map(|dt| dt.to_rfc3339()),
                    state.quote_count as i64,
                    state.is_syncing as i32,
                    state.sync_started.map(|dt| dt.to_rfc3339()),
                    &state.last_error,
                ],
            )
            .map_err(AppError::storage)?;

        Ok(())
    }

    /// Get total storage size in bytes.
    ///
    /// # Errors
    /// Returns error if file metadata cannot be read.
    pub fn storage_size(&self) -> Result<u64> {
        let path = match self.conn.path() {
            Some(p) => Path::new(p),
            None => return Ok(0),
        };
        let metadata = std::fs::metadata(path)
            .map_err(|e| AppError::io("Failed to get storage size", e))?;
        Ok(metadata.len())
    }
}
