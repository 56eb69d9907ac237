//! Crawl coordinator - per-source crawl orchestration
//!
//! This module drives one source from its initial cursor until a stop
//! condition, including:
//! - Concurrent ID windows that never run past the stopping cursor
//! - Listing pages with identical-page detection and seen-link filtering
//! - Daily archives walked concurrently, one streak tracker per day
//! - Cooperative shutdown through a watch channel
//! - Handing record batches to the single writer

use crate::config::CrawlerConfig;
use crate::crawler::{FetchOutcome, PageFetcher};
use crate::sites::{ArticleExtractor, Extraction, ListingExtractor, ListingItem};
use crate::state::{
    ArchiveDay, CrawlCursor, CursorOutcome, PageSignature, SeenLinks, StopReason, StreakTracker,
};
use crate::storage::{NewsRecord, RecordWriter};
use crate::KhabarError;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex};
use tokio::sync::{watch, Semaphore};
use tokio::task::JoinSet;
use url::Url;

/// Outcome of one source run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub site: String,
    pub stop: StopReason,
    /// ID cursors or listing pages requested
    pub attempted: u64,
    pub accepted: u64,
    pub rejected: u64,
    pub not_found: u64,
    /// Records handed to the writer
    pub records_sent: u64,
    pub last_cursor: Option<CrawlCursor>,
}

impl RunSummary {
    fn new(site: &str) -> Self {
        Self {
            site: site.to_string(),
            stop: StopReason::Exhausted,
            attempted: 0,
            accepted: 0,
            rejected: 0,
            not_found: 0,
            records_sent: 0,
            last_cursor: None,
        }
    }

    fn count(&mut self, outcome: CursorOutcome) {
        match outcome {
            CursorOutcome::Accepted => self.accepted += 1,
            CursorOutcome::Rejected => self.rejected += 1,
            CursorOutcome::NotFound => self.not_found += 1,
        }
    }

    /// Adds the counts of another run over the same site
    ///
    /// A shutdown in either run marks the combined run as shut down.
    pub fn absorb(&mut self, other: RunSummary) {
        self.attempted += other.attempted;
        self.accepted += other.accepted;
        self.rejected += other.rejected;
        self.not_found += other.not_found;
        self.records_sent += other.records_sent;
        if other.stop == StopReason::Shutdown {
            self.stop = StopReason::Shutdown;
        }
        if other.last_cursor.is_some() {
            self.last_cursor = other.last_cursor;
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: stopped ({}) after {} cursors; {} accepted, {} rejected, {} not found; {} records sent",
            self.site,
            self.stop,
            self.attempted,
            self.accepted,
            self.rejected,
            self.not_found,
            self.records_sent
        )?;
        if let Some(cursor) = &self.last_cursor {
            write!(f, "; last cursor {}", cursor)?;
        }
        Ok(())
    }
}

/// Result of fetching and extracting one article
struct ArticleResult {
    outcome: CursorOutcome,
    record: Option<NewsRecord>,
}

impl ArticleResult {
    fn empty(outcome: CursorOutcome) -> Self {
        Self {
            outcome,
            record: None,
        }
    }

    fn from_extraction(extraction: Extraction) -> Self {
        match extraction {
            Extraction::Found(record) if record.has_content() => Self {
                outcome: CursorOutcome::Accepted,
                record: Some(record),
            },
            Extraction::Found(_) | Extraction::Rejected => Self::empty(CursorOutcome::Rejected),
            Extraction::NotFound => Self::empty(CursorOutcome::NotFound),
        }
    }
}

/// Runs an extractor, turning a panic into a rejected page
fn guarded_extract<E>(url: &str, extract: E) -> ArticleResult
where
    E: FnOnce() -> Extraction,
{
    match catch_unwind(AssertUnwindSafe(extract)) {
        Ok(extraction) => ArticleResult::from_extraction(extraction),
        Err(_) => {
            tracing::error!("Extractor failed on {}", url);
            ArticleResult::empty(CursorOutcome::Rejected)
        }
    }
}

/// Body of a fetched page, or the cursor outcome a failed fetch counts as
fn fetched_body(outcome: FetchOutcome, url: &str) -> Result<(String, String), CursorOutcome> {
    match outcome {
        FetchOutcome::Page {
            body, final_url, ..
        } => Ok((body, final_url)),
        FetchOutcome::NotFound => Err(CursorOutcome::NotFound),
        FetchOutcome::Failed { status, error } => {
            match status {
                Some(status) => tracing::warn!("Failed to fetch {} (HTTP {}): {}", url, status, error),
                None => tracing::warn!("Failed to fetch {}: {}", url, error),
            }
            Err(CursorOutcome::NotFound)
        }
    }
}

/// Main coordinator structure, one per crawl
pub struct Coordinator<F: PageFetcher> {
    fetcher: Arc<F>,
    config: CrawlerConfig,
    writer: RecordWriter,
    shutdown: watch::Receiver<bool>,
    /// Bounds article fetches across every task of the run
    fetch_permits: Arc<Semaphore>,
}

impl<F: PageFetcher> Clone for Coordinator<F> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            config: self.config.clone(),
            writer: self.writer.clone(),
            shutdown: self.shutdown.clone(),
            fetch_permits: Arc::clone(&self.fetch_permits),
        }
    }
}

impl<F: PageFetcher + 'static> Coordinator<F> {
    /// Creates a new coordinator
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Source of page bodies
    /// * `config` - Concurrency and stopping limits
    /// * `writer` - Handle to the writer task that owns the store
    /// * `shutdown` - Flips to true when the crawl should wind down
    pub fn new(
        fetcher: Arc<F>,
        config: CrawlerConfig,
        writer: RecordWriter,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        let fetch_permits = Arc::new(Semaphore::new(config.workers.max(1)));
        Self {
            fetcher,
            config,
            writer,
            shutdown,
            fetch_permits,
        }
    }

    fn shutting_down(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Walks sequential article IDs from `start`
    ///
    /// IDs are fetched in concurrent windows. A window is never wider than
    /// the empty results still tolerated, so no ID after the stopping one is
    /// requested. Outcomes are applied in ID order and each window's records
    /// are sent as one batch sorted by ID.
    ///
    /// # Arguments
    ///
    /// * `extractor` - The site's article extractor
    /// * `start` - First ID to request
    /// * `count` - Maximum number of IDs to request, if capped
    pub async fn run_id_source(
        &self,
        extractor: Arc<dyn ArticleExtractor>,
        start: u64,
        count: Option<u64>,
    ) -> Result<RunSummary, KhabarError> {
        let site = extractor.name();
        let mut summary = RunSummary::new(site);
        let mut tracker =
            StreakTracker::new(self.config.empty_streak_limit, self.config.identical_streak_limit);
        let end = count.map(|count| start.saturating_add(count));
        let mut next = start;

        tracing::info!("Crawling {} from id {}", site, start);

        summary.stop = loop {
            if self.shutting_down() {
                break StopReason::Shutdown;
            }

            let remaining = end.map_or(u64::MAX, |end| end.saturating_sub(next));
            if remaining == 0 {
                break StopReason::IterationCap;
            }
            let width = (self.config.workers.max(1) as u64)
                .min(tracker.empty_budget().max(1) as u64)
                .min(remaining);

            let mut window = JoinSet::new();
            for id in next..next + width {
                let fetcher = Arc::clone(&self.fetcher);
                let extractor = Arc::clone(&extractor);
                let permits = Arc::clone(&self.fetch_permits);
                window.spawn(async move {
                    let _permit = permits.acquire_owned().await.ok();
                    let cursor = CrawlCursor::Id(id);
                    let url = extractor.article_url(id);
                    let result = match fetched_body(fetcher.fetch(&url).await, &url) {
                        Ok((body, _)) => {
                            guarded_extract(&url, || extractor.extract(&body, &cursor, &url))
                        }
                        Err(outcome) => ArticleResult::empty(outcome),
                    };
                    (id, result)
                });
            }
            next += width;

            let mut results = Vec::with_capacity(width as usize);
            while let Some(joined) = window.join_next().await {
                results.push(joined?);
            }
            results.sort_by_key(|(id, _)| *id);

            let mut batch = Vec::new();
            let mut stop = None;
            for (id, result) in results {
                let cursor = CrawlCursor::Id(id);
                tracing::info!("{} {}: {}", site, cursor, result.outcome);
                summary.attempted += 1;
                summary.count(result.outcome);
                summary.last_cursor = Some(cursor);
                batch.extend(result.record);
                if stop.is_none() {
                    stop = tracker.observe_cursor(result.outcome);
                }
            }

            summary.records_sent += batch.len() as u64;
            self.writer.send(batch).await?;

            if let Some(reason) = stop {
                break reason;
            }
        };

        tracing::info!("{}", summary);
        Ok(summary)
    }

    /// Walks numbered listing pages from `start`
    ///
    /// # Arguments
    ///
    /// * `extractor` - The site's listing extractor
    /// * `start` - First page to request
    /// * `count` - Maximum number of pages to request, if capped
    /// * `seen` - Links already stored or claimed during this run
    pub async fn run_listing_source(
        &self,
        extractor: Arc<dyn ListingExtractor>,
        start: u32,
        count: Option<u32>,
        seen: Arc<Mutex<SeenLinks>>,
    ) -> Result<RunSummary, KhabarError> {
        let site = extractor.name();
        let mut summary = RunSummary::new(site);
        let mut tracker =
            StreakTracker::new(self.config.empty_streak_limit, self.config.identical_streak_limit);
        let end = count.map(|count| start.saturating_add(count));

        tracing::info!("Crawling {} listing from page {}", site, start);

        let mut page = start;
        summary.stop = loop {
            if self.shutting_down() {
                break StopReason::Shutdown;
            }
            if end.is_some_and(|end| page >= end) {
                break StopReason::IterationCap;
            }

            let cursor = CrawlCursor::Page(page);
            if let Some(reason) = self
                .crawl_listing_page(&extractor, cursor, &mut tracker, &seen, &mut summary)
                .await?
            {
                break reason;
            }
            page += 1;
        };

        tracing::info!("{}", summary);
        Ok(summary)
    }

    /// Walks the archive of each day, several days at a time
    ///
    /// Every day starts at page 1 with its own streak tracker and stops on
    /// its own. The combined run stops with `Shutdown` if any day was
    /// interrupted and `Exhausted` once every day is done.
    pub async fn run_daily_archive(
        &self,
        extractor: Arc<dyn ListingExtractor>,
        days: Vec<ArchiveDay>,
        seen: Arc<Mutex<SeenLinks>>,
    ) -> Result<RunSummary, KhabarError> {
        let mut summary = RunSummary::new(extractor.name());
        let day_permits = Arc::new(Semaphore::new(self.config.day_workers.max(1)));

        tracing::info!("Crawling {} archive for {} days", extractor.name(), days.len());

        let mut walks = JoinSet::new();
        for day in days {
            let coordinator = self.clone();
            let extractor = Arc::clone(&extractor);
            let seen = Arc::clone(&seen);
            let permits = Arc::clone(&day_permits);
            walks.spawn(async move {
                let _permit = permits.acquire_owned().await.ok();
                coordinator.walk_day(extractor, day, seen).await
            });
        }

        let mut first_error = None;
        while let Some(joined) = walks.join_next().await {
            match joined? {
                Ok(day_summary) => summary.absorb(day_summary),
                Err(e) => {
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }
        if let Some(e) = first_error {
            return Err(e);
        }

        tracing::info!("{}", summary);
        Ok(summary)
    }

    async fn walk_day(
        &self,
        extractor: Arc<dyn ListingExtractor>,
        day: ArchiveDay,
        seen: Arc<Mutex<SeenLinks>>,
    ) -> Result<RunSummary, KhabarError> {
        let mut summary = RunSummary::new(extractor.name());
        let mut tracker =
            StreakTracker::new(self.config.empty_streak_limit, self.config.identical_streak_limit);

        let mut page = 1;
        summary.stop = loop {
            if self.shutting_down() {
                break StopReason::Shutdown;
            }
            if page > self.config.max_pages_per_day {
                break StopReason::IterationCap;
            }

            let cursor = CrawlCursor::DayPage { day, page };
            if let Some(reason) = self
                .crawl_listing_page(&extractor, cursor, &mut tracker, &seen, &mut summary)
                .await?
            {
                break reason;
            }
            page += 1;
        };

        tracing::info!("{} {} done: {}", summary.site, day, summary.stop);
        Ok(summary)
    }

    /// Fetches one listing page and the unseen articles it links to
    ///
    /// Returns the stop reason if this page ends the walk. Articles on the
    /// stopping page are still fetched and sent.
    async fn crawl_listing_page(
        &self,
        extractor: &Arc<dyn ListingExtractor>,
        cursor: CrawlCursor,
        tracker: &mut StreakTracker,
        seen: &Arc<Mutex<SeenLinks>>,
        summary: &mut RunSummary,
    ) -> Result<Option<StopReason>, KhabarError> {
        let site = extractor.name();
        let url = extractor.listing_url(&cursor);
        summary.attempted += 1;
        summary.last_cursor = Some(cursor);

        let (body, final_url) = match fetched_body(self.fetcher.fetch(&url).await, &url) {
            Ok(page) => page,
            Err(_) => {
                tracing::info!("{} {}: listing unavailable", site, cursor);
                return Ok(tracker.observe_unfetchable());
            }
        };

        let base = Url::parse(&final_url).or_else(|_| Url::parse(&url))?;
        let items = extractor.parse_listing(&body, &base);
        let listed = items.len();
        let stop = tracker.observe_listing(PageSignature::new(items.iter().map(|i| i.link.as_str())));

        let fresh: Vec<ListingItem> = {
            let mut seen = seen.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            items
                .into_iter()
                .filter(|item| seen.insert(item.link.clone()))
                .collect()
        };

        tracing::info!(
            "{} {}: {} new of {} listed (identical streak {}, empty streak {})",
            site,
            cursor,
            fresh.len(),
            listed,
            tracker.identical_streak(),
            tracker.empty_streak()
        );

        let batch = self.fetch_listed_articles(extractor, cursor, fresh, summary).await?;
        summary.records_sent += batch.len() as u64;
        self.writer.send(batch).await?;

        Ok(stop)
    }

    async fn fetch_listed_articles(
        &self,
        extractor: &Arc<dyn ListingExtractor>,
        cursor: CrawlCursor,
        items: Vec<ListingItem>,
        summary: &mut RunSummary,
    ) -> Result<Vec<NewsRecord>, KhabarError> {
        let mut articles = JoinSet::new();
        for (index, item) in items.into_iter().enumerate() {
            let fetcher = Arc::clone(&self.fetcher);
            let extractor = Arc::clone(extractor);
            let permits = Arc::clone(&self.fetch_permits);
            articles.spawn(async move {
                let _permit = permits.acquire_owned().await.ok();
                let result = match fetched_body(fetcher.fetch(&item.link).await, &item.link) {
                    Ok((body, _)) => {
                        guarded_extract(&item.link, || extractor.extract(&body, &item, &cursor))
                    }
                    Err(outcome) => ArticleResult::empty(outcome),
                };
                (index, item.link, result)
            });
        }

        let mut results = Vec::new();
        while let Some(joined) = articles.join_next().await {
            results.push(joined?);
        }
        results.sort_by_key(|(index, _, _)| *index);

        let mut batch = Vec::with_capacity(results.len());
        for (_, link, result) in results {
            tracing::debug!("{} {}: {}", extractor.name(), link, result.outcome);
            summary.count(result.outcome);
            batch.extend(result.record);
        }
        Ok(batch)
    }
}
