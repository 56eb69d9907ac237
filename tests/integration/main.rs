//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the news sites and run whole
//! crawls through the real extractors, fetcher, writer and store.

mod common;
mod daily_archive;
mod id_sources;
mod listing_sources;
mod resumption;
