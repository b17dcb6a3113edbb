//! Storage module for persisting harvested images
//!
//! This module handles:
//! - SQLite database initialization and schema management
//! - Image record lookup by source link
//! - Batched, transactional record commits
//! - Writing downloaded image bytes under the storage directory

mod files;
mod schema;
mod sqlite;
mod traits;

pub use files::{ImageFiles, IMAGE_DIRECTORY};
pub use sqlite::{init_database, SqliteStorage};
pub use traits::{ImageStore, StorageError, StorageResult};

use chrono::Utc;

/// Upper bound on the length of a stored source link, enforced by the schema
pub const MAX_LINK_LENGTH: usize = 2000;

/// A persisted image record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub id: i64,
    pub link: String,
    pub file_location: Option<String>,
    pub created_at: String,
}

/// An image record staged for the next batch commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewImageRecord {
    pub link: String,
    pub file_location: String,
    pub created_at: String,
}

impl NewImageRecord {
    /// Stages a record for a freshly stored image
    pub fn new(link: impl Into<String>, file_location: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            file_location: file_location.into(),
            created_at: Utc::now().to_rfc3339(),
        }
    }
}
