//! Configuration module for flower-images
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use flower_images::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("flower-images.toml")).unwrap();
//! println!("Harvesting from: {}", config.source.page_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ClientConfig, Config, SourceConfig, StorageConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
