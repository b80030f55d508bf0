use crate::config::types::{Config, CrawlerConfig, OutputConfig, SelectorConfig, SiteConfig};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_site_config(&config.site)?;
    validate_selector_config(&config.selectors)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.segments.is_empty() {
        return Err(ConfigError::Validation(
            "segments cannot be empty".to_string(),
        ));
    }

    for segment in &config.segments {
        if segment.is_empty() || !segment.chars().all(|c| c.is_alphanumeric() || c == '-') {
            return Err(ConfigError::Validation(format!(
                "segment must be a non-empty slug of alphanumerics and hyphens, got '{}'",
                segment
            )));
        }
    }

    if config.pages_per_segment < 1 {
        return Err(ConfigError::Validation(format!(
            "pages-per-segment must be >= 1, got {}",
            config.pages_per_segment
        )));
    }

    if config.max_records_per_run < 1 {
        return Err(ConfigError::Validation(format!(
            "max-records-per-run must be >= 1, got {}",
            config.max_records_per_run
        )));
    }

    if config.request_delay_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "request-delay-ms must be >= 100ms, got {}ms",
            config.request_delay_ms
        )));
    }

    Ok(())
}

/// Validates site configuration
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must be http(s), got '{}'",
            config.base_url
        )));
    }

    // Listing URLs are built by appending "{segment}/?p={page}"
    if !config.base_url.ends_with('/') {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must end with '/', got '{}'",
            config.base_url
        )));
    }

    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates that every configured selector parses as CSS
fn validate_selector_config(config: &SelectorConfig) -> Result<(), ConfigError> {
    check_selector(&config.listing)?;
    check_selector(&config.title_link)?;
    check_selector(&config.description)?;
    check_selector(&config.price)?;
    check_selector(&config.details)?;

    if config.location.is_empty() {
        return Err(ConfigError::Validation(
            "location selector chain cannot be empty".to_string(),
        ));
    }
    for selector in &config.location {
        check_selector(selector)?;
    }

    Ok(())
}

fn check_selector(selector: &str) -> Result<(), ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })?;
    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.dataset_path.is_empty() {
        return Err(ConfigError::Validation(
            "dataset-path cannot be empty".to_string(),
        ));
    }

    if config.checkpoint_path.is_empty() {
        return Err(ConfigError::Validation(
            "checkpoint-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
