//! Configuration module for Khabargir
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use khabargir::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("khabargir.toml")).unwrap();
//! println!("Empty streak limit: {}", config.crawler.empty_streak_limit);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, FetchConfig, OutputConfig};

// Re-export parser functions
pub use parser::{
    compute_config_hash, load_config, load_config_with_hash, load_or_default, parse_config,
};
