//! Kayhan, addressed by article ID
//!
//! Kayhan answers unknown IDs with a normal page holding an error box, so
//! not-found is detected from the body instead of the status code.

use super::html::{self, first, first_text};
use super::{article_record, non_empty, parse_body, ArticleExtractor, Extraction};
use crate::state::CrawlCursor;
use url::Url;

const MISSING_PAGE_MARKER: &str = "صفحه درخواستی شما موجود نمی باشد";

#[derive(Debug, Clone)]
pub struct Kayhan {
    base: Url,
}

impl Kayhan {
    pub fn with_base(base: Url) -> Self {
        Self { base }
    }
}

impl ArticleExtractor for Kayhan {
    fn name(&self) -> &'static str {
        "kayhan"
    }

    fn article_url(&self, id: u64) -> String {
        html::join_url(&self.base, &format!("fa/news/{}", id))
    }

    fn extract(&self, body: &str, cursor: &CrawlCursor, url: &str) -> Extraction {
        let Some(document) = parse_body(body) else {
            return Extraction::Rejected;
        };
        let root = document.root_element();

        if let Some(error_box) = first(root, "div.error_container") {
            if error_box.text().collect::<String>().contains(MISSING_PAGE_MARKER) {
                return Extraction::NotFound;
            }
        }

        let mut record = article_record(cursor, url);
        record.title = first_text(root, "h1.title");
        record.description = first_text(root, "div.subtitle");
        record.subject =
            first(root, "div.news_cat_c").and_then(|d| non_empty(html::text_excluding(d, "span")));

        let body_news = first(root, "div.body_news");
        record.full_text = body_news.and_then(|b| non_empty(html::text_lines(b)));

        record.image = body_news
            .and_then(|b| first(b, "img"))
            .and_then(|img| html::attr(img, "src"))
            .or_else(|| first(root, "div.img_news img").and_then(|img| html::attr(img, "src")))
            .map(|src| html::absolutize(&src, &self.base));

        let time = first(root, "div.news_pdate_c")
            .and_then(|d| non_empty(html::text_excluding(d, "span")));
        record.set_time(time);

        if record.has_content() {
            Extraction::Found(record)
        } else {
            Extraction::Rejected
        }
    }
}
