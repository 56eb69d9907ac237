//! Hamshahri Online, addressed by article ID

use super::html::{self, first, first_text};
use super::{article_record, parse_body, ArticleExtractor, Extraction};
use crate::state::CrawlCursor;
use url::Url;

#[derive(Debug, Clone)]
pub struct Hamshahri {
    base: Url,
}

impl Hamshahri {
    pub fn with_base(base: Url) -> Self {
        Self { base }
    }
}

impl ArticleExtractor for Hamshahri {
    fn name(&self) -> &'static str {
        "hamshahri"
    }

    fn article_url(&self, id: u64) -> String {
        html::join_url(&self.base, &format!("news/{}", id))
    }

    fn extract(&self, body: &str, cursor: &CrawlCursor, url: &str) -> Extraction {
        let Some(document) = parse_body(body) else {
            return Extraction::Rejected;
        };
        let root = document.root_element();

        // Missing and removed articles render without the headline
        let Some(title) = first_text(root, "h1.title") else {
            return Extraction::Rejected;
        };

        let mut record = article_record(cursor, url);
        record.title = Some(title);

        let crumbs = html::all(root, "ol.breadcrumb li.breadcrumb-item");
        if let Some(crumb) = crumbs.get(1) {
            record.subject = first_text(*crumb, "a").or_else(|| Some(html::text(*crumb)));
        }

        record.description = first_text(root, ".introtext");
        record.full_text = first_text(root, ".item-body");
        record.image = first(root, ".item-img img").and_then(|img| html::attr(img, "src"));
        record.set_time(first_text(root, "div.item-date span"));

        Extraction::Found(record)
    }
}
