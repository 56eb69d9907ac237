//! The news record model

use crate::date::normalize_or_none;
use chrono::Local;
use serde::{Deserialize, Serialize};

/// Column names of the record table, in output order
pub const COLUMNS: [&str; 11] = [
    "Title",
    "Link",
    "Image",
    "Description",
    "Time",
    "Gregorian_Date",
    "Scraped_Date",
    "Page",
    "Subject",
    "Full_Text",
    "Keywords",
];

/// One extracted news article
///
/// Field names serialize to the fixed column names in [`COLUMNS`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsRecord {
    #[serde(rename = "Title")]
    pub title: Option<String>,

    #[serde(rename = "Link")]
    pub link: Option<String>,

    #[serde(rename = "Image")]
    pub image: Option<String>,

    #[serde(rename = "Description")]
    pub description: Option<String>,

    /// Publication time exactly as printed by the site
    #[serde(rename = "Time")]
    pub time: Option<String>,

    /// `Time` normalized to `YYYY-MM-DD HH:MM:SS`
    #[serde(rename = "Gregorian_Date")]
    pub gregorian_date: Option<String>,

    #[serde(rename = "Scraped_Date")]
    pub scraped_date: String,

    /// Source cursor: article ID or listing page number
    #[serde(rename = "Page")]
    pub page: Option<i64>,

    #[serde(rename = "Subject")]
    pub subject: Option<String>,

    #[serde(rename = "Full_Text")]
    pub full_text: Option<String>,

    #[serde(rename = "Keywords")]
    pub keywords: Option<String>,
}

impl NewsRecord {
    /// Creates an empty record stamped with the current local time
    pub fn new(page: Option<i64>) -> Self {
        Self {
            scraped_date: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            page,
            ..Default::default()
        }
    }

    /// Sets the raw publication time and its normalized Gregorian form
    ///
    /// An unparseable time is kept as raw text with no Gregorian date.
    pub fn set_time(&mut self, raw: Option<String>) {
        self.gregorian_date = raw.as_deref().and_then(normalize_or_none);
        self.time = raw;
    }

    /// True when the record carries a title or body text
    pub fn has_content(&self) -> bool {
        is_present(&self.title) || is_present(&self.full_text)
    }

    /// Link used as the dedup key, if any
    pub fn link_key(&self) -> Option<&str> {
        self.link.as_deref().filter(|l| !l.is_empty())
    }
}

fn is_present(field: &Option<String>) -> bool {
    field.as_deref().map(|s| !s.trim().is_empty()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_stamped() {
        let record = NewsRecord::new(Some(12));
        assert_eq!(record.page, Some(12));
        assert_eq!(record.scraped_date.len(), 19);
        assert!(!record.has_content());
    }

    #[test]
    fn test_set_time_normalizes() {
        let mut record = NewsRecord::new(None);
        record.set_time(Some("۱۳ تیر ۱۴۰۳ - ۰۸:۳۸".to_string()));
        assert_eq!(record.gregorian_date.as_deref(), Some("2024-07-03 08:38:00"));

        record.set_time(Some("دیروز".to_string()));
        assert_eq!(record.time.as_deref(), Some("دیروز"));
        assert_eq!(record.gregorian_date, None);
    }

    #[test]
    fn test_has_content() {
        let mut record = NewsRecord::new(None);
        record.title = Some("  ".to_string());
        assert!(!record.has_content());

        record.full_text = Some("متن خبر".to_string());
        assert!(record.has_content());
    }

    #[test]
    fn test_empty_link_is_not_a_key() {
        let mut record = NewsRecord::new(None);
        record.link = Some(String::new());
        assert_eq!(record.link_key(), None);
    }
}
