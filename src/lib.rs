//! Khabargir: a crawler for Persian-language news sites
//!
//! This crate fetches news articles by sequential ID or by paginated archive
//! listing, extracts structured records, normalizes Jalali dates to Gregorian,
//! and merges the results into a deduplicated SQLite store.

pub mod config;
pub mod crawler;
pub mod date;
pub mod keywords;
pub mod sites;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for Khabargir operations
#[derive(Debug, Error)]
pub enum KhabarError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid cursor '{value}' for site {site}")]
    InvalidCursor { site: String, value: String },

    #[error("Crawl task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Record writer has shut down")]
    WriterGone,
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
}

/// Result type alias for Khabargir operations
pub type Result<T> = std::result::Result<T, KhabarError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use date::{normalize, DateParseError, GregorianTimestamp, PersianDate};
pub use state::{CrawlCursor, StopReason};
pub use storage::NewsRecord;
