//! Mashregh News, addressed by article ID

use super::html::{self, first, first_text};
use super::{article_record, non_empty, parse_body, ArticleExtractor, Extraction};
use crate::state::CrawlCursor;
use url::Url;

const DATE_LABEL: &str = "تاریخ انتشار:";
const SUBJECT: &str = "Mashregh";

/// Body paragraphs this short are bylines and captions
const MIN_PARAGRAPH_CHARS: usize = 10;

#[derive(Debug, Clone)]
pub struct Mashregh {
    base: Url,
}

impl Mashregh {
    pub fn with_base(base: Url) -> Self {
        Self { base }
    }
}

impl ArticleExtractor for Mashregh {
    fn name(&self) -> &'static str {
        "mashregh"
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

        record.title = first_text(root, "h1.title");
        record.description = first_text(root, "p.summary");
        record.subject = Some(SUBJECT.to_string());

        if let Some(article) = first(root, "div[itemprop=articleBody]") {
            let paragraphs: Vec<String> = html::paragraphs(article)
                .into_iter()
                .filter(|p| p.chars().count() > MIN_PARAGRAPH_CHARS)
                .collect();
            record.full_text = non_empty(paragraphs.join("\n"));
        }

        let time = first(root, "div.item-date")
            .and_then(|d| non_empty(html::text(d).replace(DATE_LABEL, "")));
        record.set_time(time);

        // The machine-readable timestamp beats the printed Jalali one
        let published = first(root, r#"meta[property="article:published_time"]"#)
            .and_then(|meta| html::attr(meta, "content"))
            .and_then(|content| html::iso_timestamp(&content));
        if published.is_some() {
            record.gregorian_date = published;
        }

        if record.title.is_some() || record.full_text.is_some() {
            Extraction::Found(record)
        } else {
            Extraction::Rejected
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> Mashregh {
        Mashregh::with_base(Url::parse("https://www.mashreghnews.ir").unwrap())
    }

    #[test]
    fn test_extracts_article() {
        let body = r#"
            <html><head>
              <meta property="article:published_time" content="2024-07-03T08:38:00+03:30">
            </head><body>
              <h1 class="title">خبر مهم</h1>
              <p class="summary">خلاصه خبر</p>
              <div class="item-date">تاریخ انتشار: ۱۳ تیر ۱۴۰۳ - ۰۸:۳۸</div>
              <div itemprop="articleBody">
                <p>کوتاه</p>
                <p>این یک بند به اندازه کافی بلند است</p>
              </div>
            </body></html>
        "#;
        let Extraction::Found(record) = extractor().extract(body, &CrawlCursor::Id(3), "u") else {
            panic!("expected a record");
        };
        assert_eq!(record.title.as_deref(), Some("خبر مهم"));
        assert_eq!(record.description.as_deref(), Some("خلاصه خبر"));
        assert_eq!(record.subject.as_deref(), Some("Mashregh"));
        assert_eq!(
            record.full_text.as_deref(),
            Some("این یک بند به اندازه کافی بلند است")
        );
        assert_eq!(record.time.as_deref(), Some("۱۳ تیر ۱۴۰۳ - ۰۸:۳۸"));
        assert_eq!(record.gregorian_date.as_deref(), Some("2024-07-03 08:38:00"));
    }

    #[test]
    fn test_printed_date_used_without_meta() {
        let body = r#"<h1 class="title">خبر</h1>
            <div class="item-date">تاریخ انتشار: <span>۲۹ بهمن ۱۴۰۲ - ۱۰:۰۰</span></div>"#;
        let Extraction::Found(record) = extractor().extract(body, &CrawlCursor::Id(3), "u") else {
            panic!("expected a record");
        };
        assert_eq!(record.time.as_deref(), Some("۲۹ بهمن ۱۴۰۲ - ۱۰:۰۰"));
        assert_eq!(record.gregorian_date.as_deref(), Some("2024-02-18 10:00:00"));
    }

    #[test]
    fn test_blank_page_is_rejected() {
        assert_eq!(
            extractor().extract("<p>x</p>", &CrawlCursor::Id(3), "u"),
            Extraction::Rejected
        );
    }
}
