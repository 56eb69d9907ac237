//! Mehr News, addressed by article ID

use super::html::{self, first, first_text};
use super::{article_record, non_empty, parse_body, ArticleExtractor, Extraction};
use crate::state::CrawlCursor;
use url::Url;

#[derive(Debug, Clone)]
pub struct Mehr {
    base: Url,
}

impl Mehr {
    pub fn with_base(base: Url) -> Self {
        Self { base }
    }
}

impl ArticleExtractor for Mehr {
    fn name(&self) -> &'static str {
        "mehr"
    }

    fn article_url(&self, id: u64) -> String {
        html::join_url(&self.base, &format!("news/{}", id))
    }

    fn extract(&self, body: &str, cursor: &CrawlCursor, url: &str) -> Extraction {
        let Some(document) = parse_body(body) else {
            return Extraction::Rejected;
        };
        let root = document.root_element();
        let mut record = article_record(cursor, url);

        let mut time = None;
        if let Some(header) = first(root, ".item-header") {
            record.title = first_text(header, "h1");
            record.description = first_text(header, ".item-summary");
            time = first_text(header, ".item-date");
        }
        record.set_time(time);

        let item_body = first(root, ".item-body");
        if let Some(item_body) = item_body {
            let paragraphs = html::paragraphs(item_body);
            record.full_text = if paragraphs.is_empty() {
                non_empty(html::text_lines(item_body))
            } else {
                Some(paragraphs.join("\n"))
            };
        }

        record.image = item_body
            .and_then(|b| first(b, "img"))
            .and_then(|img| html::attr(img, "src"))
            .or_else(|| first(root, ".item-img img").and_then(|img| html::attr(img, "src")));

        if record.title.is_some() {
            Extraction::Found(record)
        } else {
            Extraction::Rejected
        }
    }
}
