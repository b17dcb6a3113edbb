//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the ImageStore trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{ImageStore, StorageResult};
use crate::storage::{ImageRecord, NewImageRecord};
use crate::FlowerError;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const SELECT_COLUMNS: &str = "SELECT id, link, file_location, created_at FROM plain_images";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// Parent directories of `path` are created when missing.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(FlowerError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, FlowerError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = init_database(path)?;
        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> Result<Self, FlowerError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<ImageRecord> {
    Ok(ImageRecord {
        id: row.get(0)?,
        link: row.get(1)?,
        file_location: row.get(2)?,
        created_at: row.get(3)?,
    })
}

impl ImageStore for SqliteStorage {
    fn find_by_link(&self, link: &str) -> StorageResult<Option<ImageRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} WHERE link = ?1 ORDER BY id LIMIT 1", SELECT_COLUMNS))?;

        let record = stmt.query_row(params![link], record_from_row).optional()?;

        Ok(record)
    }

    fn commit_batch(&mut self, records: &[NewImageRecord]) -> StorageResult<Vec<i64>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let tx = self.conn.transaction()?;
        let mut ids = Vec::with_capacity(records.len());
        {
            let mut stmt = tx.prepare(
                "INSERT INTO plain_images (link, file_location, created_at) VALUES (?1, ?2, ?3)",
            )?;
            for record in records {
                stmt.execute(params![record.link, record.file_location, record.created_at])?;
                ids.push(tx.last_insert_rowid());
            }
        }
        tx.commit()?;

        Ok(ids)
    }

    fn count_images(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM plain_images", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn latest_images(&self, limit: usize) -> StorageResult<Vec<ImageRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} ORDER BY id DESC LIMIT ?1", SELECT_COLUMNS))?;

        let records = stmt
            .query_map(params![limit as i64], record_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }
}

/// Opens a database connection and makes sure the schema exists
pub fn init_database(path: &Path) -> Result<Connection, rusqlite::Error> {
    let conn = Connection::open(path)?;

    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
    ",
    )?;

    initialize_schema(&conn)?;

    Ok(conn)
}
