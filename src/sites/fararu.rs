//! Fararu, addressed by article ID

use super::html::{self, first, first_of, first_text};
use super::{article_record, non_empty, parse_body, ArticleExtractor, Extraction};
use crate::state::CrawlCursor;
use url::Url;

#[derive(Debug, Clone)]
pub struct Fararu {
    base: Url,
}

impl Fararu {
    pub fn with_base(base: Url) -> Self {
        Self { base }
    }
}

impl ArticleExtractor for Fararu {
    fn name(&self) -> &'static str {
        "fararu"
    }

    fn article_url(&self, id: u64) -> String {
        html::join_url(&self.base, &format!("fa/news/{}", id))
    }

    fn extract(&self, body: &str, cursor: &CrawlCursor, url: &str) -> Extraction {
        let Some(document) = parse_body(body) else {
            return Extraction::Rejected;
        };
        let root = document.root_element();
        let mut record = article_record(cursor, url);

        record.title = first_text(root, "h1");

        let news_body = first_of(root, &["div.body", "div.news-body"]);
        if let Some(news_body) = news_body {
            let paragraphs = html::paragraphs(news_body);
            record.full_text = if paragraphs.is_empty() {
                non_empty(html::text_lines(news_body))
            } else {
                Some(paragraphs.join("\n"))
            };
        }

        record.description = match first_of(root, &["div.subtitle", "div.lead"]) {
            Some(lead) => non_empty(html::text(lead)),
            None => record.full_text.as_deref().map(html::lead),
        };

        record.image = first(root, "div.main_photo img")
            .or_else(|| news_body.and_then(|b| first(b, "img")))
            .and_then(|img| html::attr(img, "src"))
            .map(|src| html::absolutize(&src, &self.base));

        record.set_time(first_text(root, "span.publish_time"));

        if record.has_content() {
            Extraction::Found(record)
        } else {
            Extraction::Rejected
        }
    }
}
