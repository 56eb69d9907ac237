//! Supported news sites
//!
//! This module provides:
//! - The extractor traits the coordinator drives
//! - One extractor per site, each holding its base URL
//! - The [`Site`] enum selectable on the command line
//!
//! Extraction is synchronous: an extractor receives a fetched body and
//! returns an [`Extraction`], so the parsed DOM never lives across an await.

pub mod html;

mod armandaily;
mod asianews;
mod banki;
mod ettelaat;
mod fararu;
mod hamshahri;
mod inn;
mod kayhan;
mod mashregh;
mod mehr;
mod tasnim;
mod voa;

pub use armandaily::ArmanDaily;
pub use asianews::AsiaNews;
pub use banki::Banki;
pub use ettelaat::Ettelaat;
pub use fararu::Fararu;
pub use hamshahri::Hamshahri;
pub use inn::Inn;
pub use kayhan::Kayhan;
pub use mashregh::Mashregh;
pub use mehr::Mehr;
pub use tasnim::Tasnim;
pub use voa::Voa;

use crate::state::CrawlCursor;
use crate::storage::NewsRecord;
use std::fmt;
use std::sync::Arc;
use url::Url;

/// Result of extracting one fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// A usable record
    Found(NewsRecord),
    /// The site says the article does not exist
    NotFound,
    /// The page was fetched but holds nothing usable
    Rejected,
}

/// One entry of a listing page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingItem {
    /// Absolute article URL
    pub link: String,
    pub title: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    /// Publication time as printed on the listing
    pub time: Option<String>,
}

/// Extractor for sites addressed by sequential article ID
pub trait ArticleExtractor: Send + Sync {
    /// Short site name used in logs and file names
    fn name(&self) -> &'static str;

    /// URL of the article with the given ID
    fn article_url(&self, id: u64) -> String;

    /// Extracts a record from a fetched article body
    ///
    /// # Arguments
    ///
    /// * `body` - The page body
    /// * `cursor` - Cursor the page was fetched for
    /// * `url` - URL the page was requested from
    fn extract(&self, body: &str, cursor: &CrawlCursor, url: &str) -> Extraction;
}

/// Extractor for sites crawled through paginated listings
pub trait ListingExtractor: Send + Sync {
    fn name(&self) -> &'static str;

    /// URL of the listing page addressed by `cursor`
    fn listing_url(&self, cursor: &CrawlCursor) -> String;

    /// Article entries of a listing page, in page order
    ///
    /// Relative links are resolved against `base`, the listing page URL.
    fn parse_listing(&self, body: &str, base: &Url) -> Vec<ListingItem>;

    /// Extracts a record from the article page of a listing entry
    fn extract(&self, body: &str, item: &ListingItem, cursor: &CrawlCursor) -> Extraction;
}

/// How a site is walked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Sequential article IDs
    ArticleIds,
    /// Numbered listing pages
    Listing,
    /// Per-day archive listings
    DailyArchive,
}

/// A site's extractor, tagged with how it is walked
#[derive(Clone)]
pub enum Source {
    Articles(Arc<dyn ArticleExtractor>),
    Listing(Arc<dyn ListingExtractor>),
    DailyArchive(Arc<dyn ListingExtractor>),
}

impl Source {
    pub fn kind(&self) -> SourceKind {
        match self {
            Self::Articles(_) => SourceKind::ArticleIds,
            Self::Listing(_) => SourceKind::Listing,
            Self::DailyArchive(_) => SourceKind::DailyArchive,
        }
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Articles(e) => e.name(),
            Self::Listing(e) | Self::DailyArchive(e) => e.name(),
        };
        write!(f, "Source({:?}, {})", self.kind(), name)
    }
}

/// Sites the crawler knows how to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Site {
    Hamshahri,
    Kayhan,
    Mehr,
    Tasnim,
    Fararu,
    Inn,
    Banki,
    Mashregh,
    Armandaily,
    Asianews,
    Voa,
    Ettelaat,
}

impl Site {
    /// Every supported site
    pub fn all() -> &'static [Site] {
        &[
            Self::Hamshahri,
            Self::Kayhan,
            Self::Mehr,
            Self::Tasnim,
            Self::Fararu,
            Self::Inn,
            Self::Banki,
            Self::Mashregh,
            Self::Armandaily,
            Self::Asianews,
            Self::Voa,
            Self::Ettelaat,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Hamshahri => "hamshahri",
            Self::Kayhan => "kayhan",
            Self::Mehr => "mehr",
            Self::Tasnim => "tasnim",
            Self::Fararu => "fararu",
            Self::Inn => "inn",
            Self::Banki => "banki",
            Self::Mashregh => "mashregh",
            Self::Armandaily => "armandaily",
            Self::Asianews => "asianews",
            Self::Voa => "voa",
            Self::Ettelaat => "ettelaat",
        }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            Self::Armandaily | Self::Asianews | Self::Voa => SourceKind::Listing,
            Self::Ettelaat => SourceKind::DailyArchive,
            _ => SourceKind::ArticleIds,
        }
    }

    /// Origin the site is crawled from
    pub fn default_base(&self) -> &'static str {
        match self {
            Self::Hamshahri => "https://www.hamshahrionline.ir",
            Self::Kayhan => "https://kayhan.ir",
            Self::Mehr => "https://www.mehrnews.com",
            Self::Tasnim => "http://tn.ai",
            Self::Fararu => "https://fararu.com",
            Self::Inn => "https://inn.ir",
            Self::Banki => "https://www.akhbarbank.com",
            Self::Mashregh => "https://www.mashreghnews.ir",
            Self::Armandaily => "https://armandaily.ir",
            Self::Asianews => "https://asianews.ir",
            Self::Voa => "https://ir.voanews.com",
            Self::Ettelaat => "https://www.ettelaat.com",
        }
    }

    /// Extractor for this site at its public address
    pub fn source(&self) -> Result<Source, url::ParseError> {
        let base = Url::parse(self.default_base())?;
        Ok(match self {
            // Tasnim serves articles from its short domain but images from the main one
            Self::Tasnim => Source::Articles(Arc::new(Tasnim::new())),
            _ => self.source_with_base(base),
        })
    }

    /// Extractor for this site served from another origin
    pub fn source_with_base(&self, base: Url) -> Source {
        match self {
            Self::Hamshahri => Source::Articles(Arc::new(Hamshahri::with_base(base))),
            Self::Kayhan => Source::Articles(Arc::new(Kayhan::with_base(base))),
            Self::Mehr => Source::Articles(Arc::new(Mehr::with_base(base))),
            Self::Tasnim => Source::Articles(Arc::new(Tasnim::with_base(base))),
            Self::Fararu => Source::Articles(Arc::new(Fararu::with_base(base))),
            Self::Inn => Source::Articles(Arc::new(Inn::with_base(base))),
            Self::Banki => Source::Articles(Arc::new(Banki::with_base(base))),
            Self::Mashregh => Source::Articles(Arc::new(Mashregh::with_base(base))),
            Self::Armandaily => Source::Listing(Arc::new(ArmanDaily::with_base(base))),
            Self::Asianews => Source::Listing(Arc::new(AsiaNews::with_base(base))),
            Self::Voa => Source::Listing(Arc::new(Voa::with_base(base))),
            Self::Ettelaat => Source::DailyArchive(Arc::new(Ettelaat::with_base(base))),
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Blank record for an article page, carrying its cursor and link
pub(crate) fn article_record(cursor: &CrawlCursor, url: &str) -> NewsRecord {
    let mut record = NewsRecord::new(Some(cursor.page_value()));
    record.link = Some(url.to_string());
    record
}

/// Parses an article body unless it is empty
pub(crate) fn parse_body(body: &str) -> Option<scraper::Html> {
    if body.trim().is_empty() {
        None
    } else {
        Some(scraper::Html::parse_document(body))
    }
}

/// Some(text) when the text is not blank
pub(crate) fn non_empty(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == text.len() {
        Some(text)
    } else {
        Some(trimmed.to_string())
    }
}
