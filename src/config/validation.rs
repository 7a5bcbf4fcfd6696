use crate::config::types::{Config, CrawlerConfig, SourceConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_source_config(&config.source)?;
    validate_crawler_config(&config.crawler)?;
    Ok(())
}

/// Validates the remote source configuration
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    if config.base_url.is_empty() {
        return Err(ConfigError::Validation(
            "base-url cannot be empty".to_string(),
        ));
    }

    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base-url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    // Credentials must come as a pair; a lone half is a config mistake, not
    // an anonymous scan.
    if config.username.is_some() != config.token.is_some() {
        return Err(ConfigError::Validation(
            "username and token must be provided together".to_string(),
        ));
    }

    for key in &config.spaces {
        validate_space_key(key)?;
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_requests < 1 || config.max_concurrent_requests > 64 {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-requests must be between 1 and 64, got {}",
            config.max_concurrent_requests
        )));
    }

    if config.window_size < 1 {
        return Err(ConfigError::Validation(format!(
            "window-size must be >= 1, got {}",
            config.window_size
        )));
    }

    if config.request_timeout_seconds < 1 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-seconds must be >= 1, got {}",
            config.request_timeout_seconds
        )));
    }

    Ok(())
}

/// Validates a space key filter entry
fn validate_space_key(key: &str) -> Result<(), ConfigError> {
    if key.is_empty() {
        return Err(ConfigError::Validation(
            "space key cannot be empty".to_string(),
        ));
    }

    if !key.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ConfigError::Validation(format!(
            "space key '{}' must be alphanumeric",
            key
        )));
    }

    Ok(())
}
