//! Crawler module for fetching and walking news sources
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic
//! - Per-source crawl coordination with streak-based stopping
//! - Whole-run orchestration: resumption, run bookkeeping, the writer task

mod coordinator;
mod fetcher;
mod run;

pub use coordinator::{Coordinator, RunSummary};
pub use fetcher::{
    backoff_delay, build_http_client, FetchError, FetchOutcome, HttpFetcher, PageFetcher,
};
pub use run::{crawl_site, resume_id, CrawlReport, CrawlRequest};
