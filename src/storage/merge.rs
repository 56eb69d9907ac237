//! Last-write-wins merge of record batches

use crate::storage::NewsRecord;
use std::collections::HashSet;

/// Merges a new batch into the existing table
///
/// Existing rows come first, then the batch. When any row has a link, rows
/// are deduplicated by link and rows without one are kept untouched;
/// otherwise rows are deduplicated by page. Among rows sharing a key only the
/// last survives, in the position of that last occurrence.
pub fn merge_records(existing: Vec<NewsRecord>, batch: Vec<NewsRecord>) -> Vec<NewsRecord> {
    let combined: Vec<NewsRecord> = existing.into_iter().chain(batch).collect();
    let by_link = combined.iter().any(|r| r.link_key().is_some());

    let mut seen_links: HashSet<String> = HashSet::new();
    let mut seen_pages: HashSet<i64> = HashSet::new();
    let mut kept: Vec<NewsRecord> = Vec::with_capacity(combined.len());

    for record in combined.into_iter().rev() {
        let keep = if by_link {
            match record.link_key() {
                Some(link) => seen_links.insert(link.to_string()),
                None => true,
            }
        } else {
            match record.page {
                Some(page) => seen_pages.insert(page),
                None => true,
            }
        };
        if keep {
            kept.push(record);
        }
    }

    kept.reverse();
    kept
}
