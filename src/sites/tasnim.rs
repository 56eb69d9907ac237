//! Tasnim, addressed by article ID through its short-link domain

use super::html::{self, first, first_of, first_text};
use super::{article_record, non_empty, parse_body, ArticleExtractor, Extraction};
use crate::state::CrawlCursor;
use url::Url;

const SHORT_LINK_ORIGIN: &str = "http://tn.ai";
const MEDIA_ORIGIN: &str = "https://www.tasnimnews.com";

#[derive(Debug, Clone)]
pub struct Tasnim {
    base: Url,
    /// Origin root-relative image paths are resolved against
    media: Url,
}

impl Tasnim {
    pub fn new() -> Self {
        Self {
            base: Url::parse(SHORT_LINK_ORIGIN).expect("constant URL parses"),
            media: Url::parse(MEDIA_ORIGIN).expect("constant URL parses"),
        }
    }

    pub fn with_base(base: Url) -> Self {
        Self {
            media: base.clone(),
            base,
        }
    }
}

impl Default for Tasnim {
    fn default() -> Self {
        Self::new()
    }
}

impl ArticleExtractor for Tasnim {
    fn name(&self) -> &'static str {
        "tasnim"
    }

    fn article_url(&self, id: u64) -> String {
        html::join_url(&self.base, &id.to_string())
    }

    fn extract(&self, body: &str, cursor: &CrawlCursor, url: &str) -> Extraction {
        let Some(document) = parse_body(body) else {
            return Extraction::Rejected;
        };
        let root = document.root_element();
        let mut record = article_record(cursor, url);

        record.title = first_text(root, "h1.title").or_else(|| first_text(root, "h1"));

        let content = first_of(root, &["div.story", "div.news-content"]);
        if let Some(content) = content {
            let paragraphs = html::paragraphs(content);
            record.full_text = if paragraphs.is_empty() {
                non_empty(html::text_lines(content))
            } else {
                Some(paragraphs.join("\n"))
            };
            record.description = paragraphs.first().map(|p| html::lead(p));
        }

        record.image = first_of(root, &["div.news-image", "div.main-photo"])
            .and_then(|d| first(d, "img"))
            .or_else(|| content.and_then(|c| first(c, "img")))
            .and_then(|img| html::attr(img, "src"))
            .map(|src| html::absolutize(&src, &self.media));

        record.set_time(first_text(root, "div.time").or_else(|| first_text(root, "span.time")));

        if record.has_content() {
            Extraction::Found(record)
        } else {
            Extraction::Rejected
        }
    }
}
