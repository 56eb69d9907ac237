//! Asia News, crawled through its paginated archive

use super::html::{self, first, first_text};
use super::{parse_body, Extraction, ListingExtractor, ListingItem};
use crate::state::CrawlCursor;
use crate::storage::NewsRecord;
use url::Url;

const IMAGE_SELECTORS: &[&str] = &[
    "article img",
    ".post-content img",
    ".entry-content img",
    ".blog-post-content img",
    "div.item-body img",
];

#[derive(Debug, Clone)]
pub struct AsiaNews {
    base: Url,
}

impl AsiaNews {
    pub fn with_base(base: Url) -> Self {
        Self { base }
    }
}

impl ListingExtractor for AsiaNews {
    fn name(&self) -> &'static str {
        "asianews"
    }

    fn listing_url(&self, cursor: &CrawlCursor) -> String {
        html::join_url(&self.base, &format!("archive?page={}", cursor.page_value()))
    }

    fn parse_listing(&self, body: &str, base: &Url) -> Vec<ListingItem> {
        let Some(document) = parse_body(body) else {
            return Vec::new();
        };

        html::all(document.root_element(), "article.blog-post")
            .into_iter()
            .filter_map(|post| {
                let href = first(post, "h2.blog-post-title a")?.value().attr("href")?;
                Some(ListingItem {
                    link: html::resolve_link(href, base)?,
                    time: first_text(post, "span.blog-post-date"),
                    ..Default::default()
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
        record.title = first_text(root, "h1.post-title.post-full-title");

        // The first selector with any match decides, even if its first image has no src
        record.image = IMAGE_SELECTORS
            .iter()
            .map(|css| html::all(root, css))
            .find(|images| !images.is_empty())
            .and_then(|images| images.into_iter().find_map(|img| html::attr(img, "src")))
            .map(|src| html::absolutize(&src, &self.base));

        record.set_time(item.time.clone());

        if record.title.is_some() || record.image.is_some() {
            Extraction::Found(record)
        } else {
            Extraction::Rejected
        }
    }
}
