//! Arman Daily, crawled through its latest-news category pages

use super::html::{self, first, first_of, first_text};
use super::{non_empty, parse_body, Extraction, ListingExtractor, ListingItem};
use crate::state::CrawlCursor;
use crate::storage::NewsRecord;
use url::Url;

/// Loose paragraphs longer than this count as body text
const MIN_LOOSE_PARAGRAPH_CHARS: usize = 50;

#[derive(Debug, Clone)]
pub struct ArmanDaily {
    base: Url,
}

impl ArmanDaily {
    pub fn with_base(base: Url) -> Self {
        Self { base }
    }
}

impl ListingExtractor for ArmanDaily {
    fn name(&self) -> &'static str {
        "armandaily"
    }

    fn listing_url(&self, cursor: &CrawlCursor) -> String {
        html::join_url(
            &self.base,
            &format!("category/last-news/page/{}/", cursor.page_value()),
        )
    }

    fn parse_listing(&self, body: &str, base: &Url) -> Vec<ListingItem> {
        let Some(document) = parse_body(body) else {
            return Vec::new();
        };

        html::all(document.root_element(), ".archive_posts")
            .into_iter()
            .filter_map(|post| first(post, "a.plus_post_ftl"))
            .filter_map(|a| a.value().attr("href"))
            .filter_map(|href| html::resolve_link(href, base))
            .map(|link| ListingItem {
                link,
                ..Default::default()
            })
            .collect()
    }

    fn extract(&self, body: &str, item: &ListingItem, cursor: &CrawlCursor) -> Extraction {
        let Some(document) = parse_body(body) else {
            return Extraction::Rejected;
        };
        let root = document.root_element();

        let Some(title) = first_text(root, "h1") else {
            return Extraction::Rejected;
        };

        let mut record = NewsRecord::new(Some(cursor.page_value()));
        record.link = Some(item.link.clone());
        record.title = Some(title);
        record.image = first_of(root, &["img[fetchpriority=high]", "img.wp-post-image"])
            .and_then(|img| html::attr(img, "src"));

        let parts = match first_of(root, &[".entry-content", ".post-content", "article"]) {
            Some(content) => html::paragraphs(content),
            None => html::all(root, "p")
                .into_iter()
                .filter(|p| {
                    let style = p.value().attr("style").unwrap_or("").to_lowercase();
                    let text = html::text(*p);
                    style.contains("text-align: justify")
                        || text.chars().count() > MIN_LOOSE_PARAGRAPH_CHARS
                })
                .map(html::text)
                .filter(|t| !t.is_empty())
                .collect(),
        };
        record.full_text = non_empty(parts.join("\n"));
        record.description = parts.first().map(|p| html::lead(p));

        Extraction::Found(record)
    }
}
