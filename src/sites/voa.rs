//! VOA Farsi, crawled through the Iran news section listing

use super::html::{self, first, first_of, first_text};
use super::{non_empty, parse_body, Extraction, ListingExtractor, ListingItem};
use crate::state::CrawlCursor;
use crate::storage::NewsRecord;
use url::Url;

#[derive(Debug, Clone)]
pub struct Voa {
    base: Url,
}

impl Voa {
    pub fn with_base(base: Url) -> Self {
        Self { base }
    }
}

impl ListingExtractor for Voa {
    fn name(&self) -> &'static str {
        "voa"
    }

    fn listing_url(&self, cursor: &CrawlCursor) -> String {
        html::join_url(&self.base, &format!("iran-news?p={}", cursor.page_value()))
    }

    fn parse_listing(&self, body: &str, base: &Url) -> Vec<ListingItem> {
        let Some(document) = parse_body(body) else {
            return Vec::new();
        };

        html::all(document.root_element(), "li.archive-list__item")
            .into_iter()
            .filter_map(|entry| {
                let href = first(entry, "a.img-wrap")?.value().attr("href")?;
                let image = first(entry, "img")
                    .and_then(|img| html::attr(img, "data-src").or_else(|| html::attr(img, "src")));
                Some(ListingItem {
                    link: html::resolve_link(href, base)?,
                    title: first_text(entry, "h4.media-block__title"),
                    image,
                    description: first_text(entry, "p.perex"),
                    time: first_text(entry, "span.date"),
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
        record.title = first_text(root, "h1.title").or_else(|| item.title.clone());
        record.image = item.image.clone();
        record.description = item.description.clone();
        record.subject = Some("VOA Farsi".to_string());

        record.full_text = first_of(root, &["div.wsw", "div#article-content"])
            .and_then(|content| non_empty(html::paragraphs(content).join("\n")));

        match first(root, "time") {
            Some(time) => {
                record.time = non_empty(html::text(time)).or_else(|| item.time.clone());
                record.gregorian_date = html::attr(time, "datetime")
                    .and_then(|dt| html::iso_timestamp(dt.split('T').next().unwrap_or(&dt)));
            }
            None => record.set_time(item.time.clone()),
        }

        if record.has_content() {
            Extraction::Found(record)
        } else {
            Extraction::Rejected
        }
    }
}
