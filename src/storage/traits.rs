//! Storage traits and error types
//!
//! This module defines the trait interface for record stores and the
//! associated error types.

use crate::state::StopReason;
use crate::storage::{NewsRecord, RunRecord, RunStatus, SaveReport};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Corrupt row: {0}")]
    CorruptRow(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for record store implementations
///
/// A store is owned by exactly one writer at a time; nothing here is meant to
/// be shared across threads.
pub trait RecordStore {
    // ===== Records =====

    /// Merges a batch into the stored table and persists the result
    ///
    /// # Arguments
    ///
    /// * `batch` - Newly extracted records
    ///
    /// # Returns
    ///
    /// Counts describing what the merge did
    fn save_batch(&mut self, batch: Vec<NewsRecord>) -> StorageResult<SaveReport>;

    /// Loads all records in table order
    fn load_records(&self) -> StorageResult<Vec<NewsRecord>>;

    /// Counts stored records
    fn count_records(&self) -> StorageResult<u64>;

    /// Highest `Page` value stored, used to resume ID crawls
    fn max_page(&self) -> StorageResult<Option<i64>>;

    /// All non-empty links stored
    fn load_links(&self) -> StorageResult<Vec<String>>;

    // ===== Run Management =====

    /// Creates a new crawl run
    ///
    /// # Arguments
    ///
    /// * `site` - Name of the site being crawled
    /// * `config_hash` - Hash of the configuration file
    ///
    /// # Returns
    ///
    /// The ID of the newly created run
    fn create_run(&mut self, site: &str, config_hash: &str) -> StorageResult<i64>;

    /// Marks a run as finished
    fn finish_run(
        &mut self,
        run_id: i64,
        status: RunStatus,
        stop_reason: Option<StopReason>,
        records_saved: u64,
    ) -> StorageResult<()>;

    /// Gets the most recent run
    fn latest_run(&self) -> StorageResult<Option<RunRecord>>;
}
