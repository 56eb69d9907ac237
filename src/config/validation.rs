use crate::config::types::{Config, CrawlerConfig, FetchConfig, OutputConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_fetch_config(&config.fetch)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > 64 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 64, got {}",
            config.workers
        )));
    }

    if config.day_workers < 1 || config.day_workers > 64 {
        return Err(ConfigError::Validation(format!(
            "day_workers must be between 1 and 64, got {}",
            config.day_workers
        )));
    }

    if config.empty_streak_limit < 1 {
        return Err(ConfigError::Validation(format!(
            "empty_streak_limit must be >= 1, got {}",
            config.empty_streak_limit
        )));
    }

    if config.identical_streak_limit < 1 {
        return Err(ConfigError::Validation(format!(
            "identical_streak_limit must be >= 1, got {}",
            config.identical_streak_limit
        )));
    }

    if config.max_pages_per_day < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages_per_day must be >= 1, got {}",
            config.max_pages_per_day
        )));
    }

    Ok(())
}

/// Validates HTTP fetch configuration
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 || config.connect_timeout_secs > config.timeout_secs {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs must be between 1 and timeout_secs ({}), got {}",
            config.timeout_secs, config.connect_timeout_secs
        )));
    }

    if config.max_retries > 10 {
        return Err(ConfigError::Validation(format!(
            "max_retries must be <= 10, got {}",
            config.max_retries
        )));
    }

    if config.max_backoff_ms < config.retry_delay_ms {
        return Err(ConfigError::Validation(format!(
            "max_backoff_ms ({}) must not be smaller than retry_delay_ms ({})",
            config.max_backoff_ms, config.retry_delay_ms
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_dir.is_empty() {
        return Err(ConfigError::Validation(
            "database_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}
