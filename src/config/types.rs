use crate::config::validation::validate_storage_config;
use crate::ConfigError;
use serde::Deserialize;

/// Main configuration structure for flower-images
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub source: SourceConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

impl Config {
    /// Replaces the storage base directory, e.g. from `--default-storage`
    pub fn override_default_storage(&mut self, dir: impl Into<String>) -> Result<(), ConfigError> {
        let storage = StorageConfig {
            default_storage: dir.into(),
            database_path: self.storage.database_path.clone(),
        };
        validate_storage_config(&storage)?;
        self.storage = storage;
        Ok(())
    }
}

/// Where candidate images come from
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Listing page scanned for `<img>` tags
    #[serde(rename = "page-url")]
    pub page_url: String,

    /// Substring every eligible image URL must contain
    #[serde(rename = "image-link-pattern")]
    pub image_link_pattern: String,
}

/// Local persistence configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Base directory; images are written under `<default-storage>/images`
    #[serde(rename = "default-storage")]
    pub default_storage: String,

    /// Path to the SQLite database holding image records
    #[serde(rename = "database-path")]
    pub database_path: String,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    format!("flower-images/{}", env!("CARGO_PKG_VERSION"))
}
