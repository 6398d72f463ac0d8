//! Adjutant Merge Store
//!
//! Implements the `ActionStore` trait over SQLite.
//!
//! # Architecture
//!
//! - One table of action items keyed by `external_id`
//! - Upsert is a single `INSERT .. ON CONFLICT DO UPDATE` statement, so the
//!   sticky-status merge cannot interleave with another writer's
//!   read-modify-write
//! - The "last import" snapshot lives in its own single-row table and is
//!   overwritten wholesale per run
//! - Grouped views are derived from the flat table on read, never stored
//!
//! # Examples
//!
//! ```no_run
//! use adjutant_store::SqliteStore;
//!
//! let store = SqliteStore::new("adjutant.db").unwrap();
//! // Store is now ready for upsert/flatten operations
//! ```

#![warn(missing_docs)]

use adjutant_domain::traits::{ActionStore, Upserted};
use adjutant_domain::{ActionItem, ExternalId, ItemStatus, Priority, Provenance, SourceKind};
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Item not found
    #[error("Item not found: {0}")]
    NotFound(String),

    /// Invalid data format in a stored row
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Snapshot (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// SQLite-based implementation of ActionStore
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own
/// SqliteStore instance; writers serialize through `&mut self`.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Number of items in the store
    pub fn len(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Whether the store holds no items
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// Persist the last-import snapshot, superseding any prior snapshot
    pub fn save_snapshot<T: Serialize>(&mut self, snapshot: &T) -> Result<(), StoreError> {
        let payload = serde_json::to_string(snapshot)?;
        self.conn.execute(
            "INSERT INTO last_import (id, payload, saved_at) VALUES (1, ?1, ?2)
             ON CONFLICT(id) DO UPDATE SET payload = excluded.payload, saved_at = excluded.saved_at",
            params![payload, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Load the last-import snapshot, if one has been saved
    pub fn load_snapshot<T: DeserializeOwned>(&self) -> Result<Option<T>, StoreError> {
        let payload: Option<String> = self
            .conn
            .query_row("SELECT payload FROM last_import WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;

        match payload {
            Some(p) => Ok(Some(serde_json::from_str(&p)?)),
            None => Ok(None),
        }
    }

    fn set_status(&mut self, id: &ExternalId, status: ItemStatus) -> Result<(), StoreError> {
        let changed = self.conn.execute(
            "UPDATE items SET status = ?1, updated_at = ?2 WHERE external_id = ?3",
            params![status.as_str(), Utc::now().to_rfc3339(), id.as_str()],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn item_from_row(row: &Row<'_>) -> rusqlite::Result<ActionItem> {
        let priority_str: String = row.get(4)?;
        let status_str: String = row.get(5)?;
        let kind_str: String = row.get(7)?;
        let due_date_str: Option<String> = row.get(3)?;

        let priority = Priority::parse(&priority_str).unwrap_or_default();
        let status = ItemStatus::parse(&status_str).unwrap_or_default();
        let kind = SourceKind::parse(&kind_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                7,
                rusqlite::types::Type::Text,
                format!("unknown source kind: {}", kind_str).into(),
            )
        })?;
        let due_date = due_date_str
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());

        Ok(ActionItem {
            external_id: ExternalId::from_string(row.get::<_, String>(0)?),
            text: row.get(1)?,
            owner: row.get(2)?,
            due_date,
            priority,
            status,
            context: row.get(6)?,
            provenance: Provenance {
                kind,
                folder: row.get(8)?,
                doc_id: row.get(9)?,
                doc_name: row.get(10)?,
                doc_link: row.get(11)?,
            },
        })
    }
}

const SELECT_COLUMNS: &str = "external_id, text, owner, due_date, priority, status, context,
     source_kind, source_folder, source_doc_id, source_doc_name, doc_link";

impl ActionStore for SqliteStore {
    type Error = StoreError;

    fn upsert(&mut self, item: &ActionItem) -> Result<Upserted, Self::Error> {
        let existed: bool = self
            .conn
            .query_row(
                "SELECT 1 FROM items WHERE external_id = ?1",
                params![item.external_id.as_str()],
                |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);

        let now = Utc::now().to_rfc3339();

        // The sticky-status rule lives inside the statement: done survives a
        // blind re-extraction reporting todo, and only reopen() reverts it.
        self.conn.execute(
            "INSERT INTO items (external_id, text, owner, due_date, priority, status, context,
                                source_kind, source_folder, source_doc_id, source_doc_name, doc_link,
                                created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?13)
             ON CONFLICT(external_id) DO UPDATE SET
                 text = excluded.text,
                 owner = excluded.owner,
                 due_date = excluded.due_date,
                 priority = excluded.priority,
                 status = CASE
                     WHEN items.status = 'done' AND excluded.status = 'todo' THEN 'done'
                     ELSE excluded.status
                 END,
                 context = excluded.context,
                 source_kind = excluded.source_kind,
                 source_folder = excluded.source_folder,
                 source_doc_id = excluded.source_doc_id,
                 source_doc_name = excluded.source_doc_name,
                 doc_link = excluded.doc_link,
                 updated_at = excluded.updated_at",
            params![
                item.external_id.as_str(),
                item.text,
                item.owner,
                item.due_date.map(|d| d.format("%Y-%m-%d").to_string()),
                item.priority.as_str(),
                item.status.as_str(),
                item.context,
                item.provenance.kind.as_str(),
                item.provenance.folder,
                item.provenance.doc_id,
                item.provenance.doc_name,
                item.provenance.doc_link,
                now,
            ],
        )?;

        Ok(if existed {
            Upserted::Updated
        } else {
            Upserted::Created
        })
    }

    fn get(&self, id: &ExternalId) -> Result<Option<ActionItem>, Self::Error> {
        let sql = format!("SELECT {} FROM items WHERE external_id = ?1", SELECT_COLUMNS);
        let item = self
            .conn
            .query_row(&sql, params![id.as_str()], Self::item_from_row)
            .optional()?;
        Ok(item)
    }

    fn flatten(&self) -> Result<Vec<ActionItem>, Self::Error> {
        // Dateless items after all dated items; insertion order breaks ties.
        let sql = format!(
            "SELECT {} FROM items ORDER BY (due_date IS NULL), due_date ASC, rowid ASC",
            SELECT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let items = stmt
            .query_map([], Self::item_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(items)
    }

    fn mark_done(&mut self, id: &ExternalId) -> Result<(), Self::Error> {
        self.set_status(id, ItemStatus::Done)
    }

    fn reopen(&mut self, id: &ExternalId) -> Result<(), Self::Error> {
        self.set_status(id, ItemStatus::Todo)
    }
}
