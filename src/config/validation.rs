use crate::config::types::{ClientConfig, Config, SourceConfig, StorageConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_source_config(&config.source)?;
    validate_storage_config(&config.storage)?;
    validate_client_config(&config.client)?;
    Ok(())
}

/// Validates the source page settings
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.page_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid page-url '{}': {}", config.page_url, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "page-url '{}' must use http or https",
            config.page_url
        )));
    }

    if config.image_link_pattern.is_empty() {
        return Err(ConfigError::Validation(
            "image-link-pattern cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates storage locations
pub(crate) fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.default_storage.trim().is_empty() {
        return Err(ConfigError::Validation(
            "default-storage cannot be empty".to_string(),
        ));
    }

    if config.database_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_client_config(config: &ClientConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }
    Ok(())
}
