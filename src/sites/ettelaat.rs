//! Ettelaat, crawled through its per-day archive

use super::html::{self, first, first_of, first_text};
use super::{non_empty, parse_body, Extraction, ListingExtractor, ListingItem};
use crate::state::CrawlCursor;
use crate::storage::NewsRecord;
use url::Url;

#[derive(Debug, Clone)]
pub struct Ettelaat {
    base: Url,
}

impl Ettelaat {
    pub fn with_base(base: Url) -> Self {
        Self { base }
    }
}

impl ListingExtractor for Ettelaat {
    fn name(&self) -> &'static str {
        "ettelaat"
    }

    /// Archive page for a day, or the undated archive for a plain page cursor
    fn listing_url(&self, cursor: &CrawlCursor) -> String {
        let path = match cursor {
            CrawlCursor::DayPage { day, page } => format!(
                "archive?pi={}&ms=0&dy={}&mn={}&yr={}",
                page, day.day, day.month, day.year
            ),
            other => format!("archive?pi={}&ms=0", other.page_value()),
        };
        html::join_url(&self.base, &path)
    }

    fn parse_listing(&self, body: &str, base: &Url) -> Vec<ListingItem> {
        let Some(document) = parse_body(body) else {
            return Vec::new();
        };

        html::all(document.root_element(), "li.news")
            .into_iter()
            .filter_map(|entry| {
                let anchor = first(entry, ".desc h3 a")?;
                Some(ListingItem {
                    link: html::resolve_link(anchor.value().attr("href")?, base)?,
                    title: non_empty(html::text(anchor)),
                    image: first(entry, "figure a img").and_then(|img| html::attr(img, "src")),
                    description: first_text(entry, ".desc p"),
                    time: first_text(entry, ".desc time"),
                })
            })
            .collect()
    }

    fn extract(&self, body: &str, item: &ListingItem, cursor: &CrawlCursor) -> Extraction {
        let Some(document) = parse_body(body) else {
            return Extraction::Rejected;
        };
        let root = document.root_element();

        let mut record = NewsRecord::new(Some(cursor.page_value()));
        record.link = Some(item.link.clone());
        record.title = item.title.clone();
        record.image = item.image.clone();
        record.description = item.description.clone();
        record.set_time(item.time.clone());

        let section = first(root, "li.breadcrumb-item a[itemprop='articleSection']")
            .or_else(|| html::all(root, "li.breadcrumb-item a").get(1).copied());
        record.subject = section.and_then(|a| non_empty(html::text(a)));

        record.full_text = first_of(root, &["div.body", "div.item-text", "article"])
            .and_then(|content| non_empty(html::text_lines(content)));

        Extraction::Found(record)
    }
}
