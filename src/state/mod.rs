//! State module for tracking crawl progress
//!
//! This module provides the per-run state the coordinator threads through a
//! crawl.
//!
//! # Components
//!
//! - `CrawlCursor`: Addresses the next ID, listing page, or archive day page
//! - `CursorOutcome` / `StopReason`: What happened to a cursor, and why a run ended
//! - `StreakTracker`: Empty and identical-page stopping heuristics
//! - `SeenLinks`: Links already persisted or processed

mod cursor;
mod outcome;
mod streak;

// Re-export main types
pub use cursor::{ArchiveDay, CrawlCursor, PageSignature, SeenLinks};
pub use outcome::{CursorOutcome, StopReason};
pub use streak::StreakTracker;
