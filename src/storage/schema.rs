//! Database schema definitions
//!
//! This module contains the SQL schema for the image record database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per downloaded image
CREATE TABLE IF NOT EXISTS plain_images (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    link TEXT NOT NULL CHECK (length(link) <= 2000),
    file_location TEXT CHECK (file_location IS NULL OR length(file_location) <= 2000),
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_plain_images_link ON plain_images(link);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
