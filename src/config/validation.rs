use crate::config::types::{Config, CrawlerConfig, FilterConfig, OutputConfig, UserAgentConfig};
use crate::url::LinkFilter;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_seeds(&config.seeds)?;
    validate_extensions(&config.extensions)?;
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_filter_config(&config.filter)?;
    Ok(())
}

/// Validates seed URLs: each must be an absolute HTTP(S) URL
fn validate_seeds(seeds: &[String]) -> Result<(), ConfigError> {
    if seeds.is_empty() {
        return Err(ConfigError::Validation(
            "at least one seed URL is required".to_string(),
        ));
    }

    for seed in seeds {
        let url = Url::parse(seed)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "Seed URL '{}' must use HTTP or HTTPS",
                seed
            )));
        }
    }

    Ok(())
}

/// Validates tracked extensions
fn validate_extensions(extensions: &[String]) -> Result<(), ConfigError> {
    if extensions.is_empty() {
        tracing::warn!("No extensions configured, nothing will be downloaded");
    }

    for ext in extensions {
        let bare = ext.trim().trim_start_matches('.');

        if bare.is_empty() {
            return Err(ConfigError::Validation(format!(
                "extension '{}' is empty",
                ext
            )));
        }

        // Only the text after the last dot of a filename is ever compared
        if bare.contains('.') {
            return Err(ConfigError::Validation(format!(
                "extension '{}' cannot contain an inner '.'",
                ext
            )));
        }
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_depth < 1 {
        return Err(ConfigError::Validation(
            "max-depth must be >= 1 (seeds are depth 1)".to_string(),
        ));
    }

    if config.page_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "page-timeout-secs must be >= 1, got {}",
            config.page_timeout_secs
        )));
    }

    if config.download_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "download-timeout-secs must be >= 1, got {}",
            config.download_timeout_secs
        )));
    }

    if config.max_concurrent_downloads < 1 {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-downloads must be >= 1, got {}",
            config.max_concurrent_downloads
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters, hyphens and underscores, got '{}'",
            config.crawler_name
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates include/exclude patterns
///
/// The include pattern is mandatory. Discovery stops at the seeds when it
/// matches nothing, so an empty pattern is refused outright instead of being
/// read as "match everything".
fn validate_filter_config(config: &FilterConfig) -> Result<(), ConfigError> {
    if config.include.trim().is_empty() {
        return Err(ConfigError::Validation(
            "filter.include cannot be empty; use \".*\" to accept every URI".to_string(),
        ));
    }

    LinkFilter::from_config(config)?;

    Ok(())
}
