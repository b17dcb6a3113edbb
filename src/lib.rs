//! Flower images: a scheduled storefront image harvester
//!
//! This crate scrapes a configured storefront page for `<img>` URLs on a
//! trusted image host, shuffles them, and downloads up to three images that
//! have not been recorded before, persisting one record per saved image.

pub mod config;
pub mod harvest;
pub mod output;
pub mod storage;

use thiserror::Error;

/// Main error type for harvest operations
#[derive(Debug, Error)]
pub enum FlowerError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Unfollowed redirect ({status}) for {url}")]
    Redirect { url: String, status: u16 },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for harvest operations
pub type Result<T> = std::result::Result<T, FlowerError>;

// Re-export commonly used types
pub use config::Config;
pub use harvest::{extract_candidates, run, run_with_config, save_new_images, MAX_IMAGES_PER_RUN};
pub use output::RunReport;
pub use storage::{ImageRecord, ImageStore, NewImageRecord, SqliteStorage};
