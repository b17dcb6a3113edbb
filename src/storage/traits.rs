//! Storage traits and error types
//!
//! This module defines the trait interface for image record backends and
//! associated error types.

use crate::storage::{ImageRecord, NewImageRecord};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for image record backends
///
/// Records are append-only: nothing here updates or deletes them.
pub trait ImageStore {
    /// Finds the record whose link equals `link` exactly
    fn find_by_link(&self, link: &str) -> StorageResult<Option<ImageRecord>>;

    /// Durably persists all staged records in one operation
    ///
    /// Either every record is stored or none is. Returns the assigned ids in
    /// input order; an empty batch is a no-op.
    fn commit_batch(&mut self, records: &[NewImageRecord]) -> StorageResult<Vec<i64>>;

    /// Counts all stored records
    fn count_images(&self) -> StorageResult<u64>;

    /// Returns up to `limit` records, newest first
    fn latest_images(&self, limit: usize) -> StorageResult<Vec<ImageRecord>>;
}
