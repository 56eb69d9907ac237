//! Akhbar Bank, addressed by article ID

use super::html::{self, first, first_text};
use super::{article_record, non_empty, parse_body, ArticleExtractor, Extraction};
use crate::state::CrawlCursor;
use url::Url;

/// Length of a title taken from the opening line of the body
const FALLBACK_TITLE_CHARS: usize = 100;

#[derive(Debug, Clone)]
pub struct Banki {
    base: Url,
}

impl Banki {
    pub fn with_base(base: Url) -> Self {
        Self { base }
    }
}

impl ArticleExtractor for Banki {
    fn name(&self) -> &'static str {
        "banki"
    }

    fn article_url(&self, id: u64) -> String {
        html::join_url(&self.base, &format!("news/{}", id))
    }

    fn extract(&self, body: &str, cursor: &CrawlCursor, url: &str) -> Extraction {
        let Some(document) = parse_body(body) else {
            return Extraction::Rejected;
        };
        let root = document.root_element();

        let Some(content) = first(root, "div#doctextarea") else {
            return Extraction::Rejected;
        };
        let Some(full_text) = non_empty(html::text_lines(content)) else {
            return Extraction::Rejected;
        };

        let mut record = article_record(cursor, url);
        record.title = first_text(root, "h1").or_else(|| {
            full_text
                .lines()
                .next()
                .map(|line| html::truncate_chars(line, FALLBACK_TITLE_CHARS))
        });
        record.image = first(content, "img")
            .or_else(|| first(root, "img.news_image"))
            .and_then(|img| html::attr(img, "src"))
            .map(|src| html::absolutize(&src, &self.base));
        record.full_text = Some(full_text);

        Extraction::Found(record)
    }
}
