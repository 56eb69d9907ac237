//! Storage module for persisting crawl results
//!
//! This module handles all persistence for the crawler, including:
//! - The news record model and last-write-wins merge
//! - SQLite database initialization and schema management
//! - Run tracking for resumption and statistics
//! - The single writer task that owns the store during a crawl
//! - CSV spreadsheet export

mod export;
mod merge;
mod record;
mod schema;
mod sqlite;
mod traits;
mod writer;

pub use export::export_csv;
pub use merge::merge_records;
pub use record::{NewsRecord, COLUMNS};
pub use sqlite::SqliteStorage;
pub use traits::{RecordStore, StorageError, StorageResult};
pub use writer::{spawn_writer, RecordWriter, WriterTotals};

use crate::state::StopReason;

/// Counts describing one merge into the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveReport {
    /// Records in the incoming batch
    pub received: usize,
    /// Rows dropped because a later row shared their key
    pub replaced: usize,
    /// Rows in the table after the merge
    pub total: usize,
}

/// Represents a crawl run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub site: String,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub status: RunStatus,
    pub stop_reason: Option<StopReason>,
    pub records_saved: u64,
}

/// Status of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    Interrupted,
    Failed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Interrupted => "interrupted",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "interrupted" => Some(Self::Interrupted),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Status a run ends with, given why it stopped
    pub fn from_stop(reason: StopReason) -> Self {
        match reason {
            StopReason::Shutdown => Self::Interrupted,
            _ => Self::Completed,
        }
    }
}
