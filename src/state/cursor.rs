//! Crawl cursors, listing page signatures and the seen-link set

use crate::date::jalali;
use chrono::{Days, NaiveDate};
use std::collections::HashSet;
use std::fmt;

/// One day of a Jalali-dated archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArchiveDay {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl ArchiveDay {
    /// Jalali day on which the given Gregorian date falls
    pub fn from_gregorian(date: NaiveDate) -> Option<Self> {
        let (year, month, day) = jalali::from_gregorian(date)?;
        Some(Self { year, month, day })
    }

    /// The `count` Jalali days ending at `today`, oldest first
    pub fn last_days(today: NaiveDate, count: u32) -> Vec<Self> {
        let mut days: Vec<Self> = (0..count)
            .filter_map(|back| today.checked_sub_days(Days::new(back as u64)))
            .filter_map(Self::from_gregorian)
            .collect();
        days.reverse();
        days
    }
}

impl fmt::Display for ArchiveDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{:02}/{:02}", self.year, self.month, self.day)
    }
}

/// Position addressing the next unit of crawl work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlCursor {
    /// Sequential article ID
    Id(u64),
    /// Page of a paginated listing
    Page(u32),
    /// Page of a single day's archive listing
    DayPage { day: ArchiveDay, page: u32 },
}

impl CrawlCursor {
    /// The cursor that follows this one
    pub fn next(&self) -> Self {
        match *self {
            Self::Id(id) => Self::Id(id + 1),
            Self::Page(page) => Self::Page(page + 1),
            Self::DayPage { day, page } => Self::DayPage {
                day,
                page: page + 1,
            },
        }
    }

    /// Value stored in a record's `Page` column
    pub fn page_value(&self) -> i64 {
        match *self {
            Self::Id(id) => id as i64,
            Self::Page(page) | Self::DayPage { page, .. } => page as i64,
        }
    }
}

impl fmt::Display for CrawlCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id {}", id),
            Self::Page(page) => write!(f, "page {}", page),
            Self::DayPage { day, page } => write!(f, "{} page {}", day, page),
        }
    }
}

/// Ordered link identifiers of one listing page
///
/// Two consecutive pages with equal signatures mean the site is serving the
/// same page again instead of running out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSignature(Vec<String>);

impl PageSignature {
    pub fn new<I, S>(links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(links.into_iter().map(Into::into).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Links already persisted or processed during a run
#[derive(Debug, Clone, Default)]
pub struct SeenLinks {
    links: HashSet<String>,
}

impl SeenLinks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, link: &str) -> bool {
        self.links.contains(link)
    }

    /// Marks a link as seen, returning false if it already was
    pub fn insert(&mut self, link: impl Into<String>) -> bool {
        self.links.insert(link.into())
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for SeenLinks {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            links: iter.into_iter().map(Into::into).collect(),
        }
    }
}
