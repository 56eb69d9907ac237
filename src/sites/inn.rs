//! INN (Iran News Network), addressed by article ID

use super::html::{self, first, first_text};
use super::{article_record, non_empty, parse_body, ArticleExtractor, Extraction};
use crate::state::CrawlCursor;
use scraper::ElementRef;
use url::Url;

#[derive(Debug, Clone)]
pub struct Inn {
    base: Url,
}

impl Inn {
    pub fn with_base(base: Url) -> Self {
        Self { base }
    }
}

/// Lead image: high fetch priority, then eager loading, then alt text equal to the title
fn lead_image<'a>(root: ElementRef<'a>, title: Option<&str>) -> Option<ElementRef<'a>> {
    first(root, "img[fetchpriority=high]")
        .or_else(|| first(root, "img[loading=eager]"))
        .or_else(|| {
            let title = title?;
            html::all(root, "img[alt]")
                .into_iter()
                .find(|img| img.value().attr("alt") == Some(title))
        })
}

impl ArticleExtractor for Inn {
    fn name(&self) -> &'static str {
        "inn"
    }

    fn article_url(&self, id: u64) -> String {
        html::join_url(&self.base, &format!("news/article/{}", id))
    }

    fn extract(&self, body: &str, cursor: &CrawlCursor, url: &str) -> Extraction {
        let Some(document) = parse_body(body) else {
            return Extraction::Rejected;
        };
        let root = document.root_element();
        let mut record = article_record(cursor, url);

        if let Some(content) = first(root, "div.content") {
            record.full_text = non_empty(html::text_lines(content));
            record.description = first_text(content, "p");
        }

        record.title = first_text(root, "h1");

        if let Some(img) = lead_image(root, record.title.as_deref()) {
            record.image = html::attr(img, "src").map(|src| html::absolutize(&src, &self.base));
            if record.title.is_none() {
                record.title = html::attr(img, "alt");
            }
        }

        let details_time = first(root, "div.details time.date");
        match details_time.and_then(|t| non_empty(html::text(t))) {
            Some(printed) => record.set_time(Some(printed)),
            None => match details_time.and_then(|t| html::attr(t, "datetime")) {
                // The attribute is ISO 8601 and already Gregorian
                Some(iso) => {
                    record.gregorian_date = html::iso_timestamp(&iso);
                    record.time = Some(iso);
                }
                None => record.set_time(first_text(root, "time.date")),
            },
        }

        if record.has_content() {
            Extraction::Found(record)
        } else {
            Extraction::Rejected
        }
    }
}
