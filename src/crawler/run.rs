//! One crawl of one site, from opening the store to recording the run

use crate::config::Config;
use crate::crawler::{Coordinator, PageFetcher, RunSummary};
use crate::sites::{Site, Source};
use crate::state::{ArchiveDay, SeenLinks};
use crate::storage::{spawn_writer, RecordStore, RunStatus, WriterTotals};
use crate::KhabarError;
use chrono::{Local, NaiveDate};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use url::Url;

/// What to crawl
#[derive(Debug, Clone)]
pub struct CrawlRequest {
    pub site: Site,
    /// First cursor; resumed from the store when absent
    pub start: Option<u64>,
    /// IDs or listing pages to walk, or days for a daily archive
    pub count: u64,
    /// Serve the site from another origin
    pub base: Option<Url>,
    /// Last day of a daily archive walk; today when absent
    pub until: Option<NaiveDate>,
}

impl CrawlRequest {
    pub fn new(site: Site, count: u64) -> Self {
        Self {
            site,
            start: None,
            count,
            base: None,
            until: None,
        }
    }
}

/// Result of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub run_id: i64,
    pub summary: RunSummary,
    pub totals: WriterTotals,
}

/// First ID cursor of an ID-indexed crawl
///
/// An explicit start wins. Otherwise the crawl resumes one past the highest
/// stored `Page`, or begins at 1 on an empty store.
pub fn resume_id<S: RecordStore>(store: &S, start: Option<u64>) -> Result<u64, KhabarError> {
    if let Some(start) = start {
        return Ok(start);
    }
    Ok(match store.max_page()? {
        Some(max) if max >= 0 => max as u64 + 1,
        _ => 1,
    })
}

fn page_cursor(site: Site, value: u64) -> Result<u32, KhabarError> {
    u32::try_from(value).map_err(|_| KhabarError::InvalidCursor {
        site: site.name().to_string(),
        value: value.to_string(),
    })
}

/// Crawls one site into `store`
///
/// The store is moved into the writer task for the duration of the crawl
/// and handed back afterwards together with the report. The run is recorded
/// in the store, including when the crawl fails after starting.
///
/// # Arguments
///
/// * `fetcher` - Source of page bodies
/// * `config` - Loaded configuration
/// * `config_hash` - Hash recorded on the run
/// * `store` - The site's record store
/// * `request` - Site, cursors and limits
/// * `shutdown` - Flips to true on Ctrl-C
///
/// # Returns
///
/// * `Ok((store, report))` - The crawl stopped normally or was interrupted
/// * `Err(KhabarError)` - Persistence failed or the crawl could not start
pub async fn crawl_site<F, S>(
    fetcher: Arc<F>,
    config: &Config,
    config_hash: &str,
    mut store: S,
    request: &CrawlRequest,
    shutdown: watch::Receiver<bool>,
) -> Result<(S, CrawlReport), KhabarError>
where
    F: PageFetcher + 'static,
    S: RecordStore + Send + 'static,
{
    let site = request.site;
    let source = match &request.base {
        Some(base) => site.source_with_base(base.clone()),
        None => site.source()?,
    };

    let id_start = match source {
        Source::Articles(_) => Some(resume_id(&store, request.start)?),
        _ => None,
    };
    let seen = match source {
        Source::Articles(_) => SeenLinks::new(),
        _ => store.load_links()?.into_iter().collect(),
    };
    if !seen.is_empty() {
        tracing::info!("{} links already stored for {}", seen.len(), site);
    }

    let run_id = store.create_run(site.name(), config_hash)?;
    tracing::info!("Started run {} for {}", run_id, site);

    let (writer, handle) = spawn_writer(store, config.crawler.workers.max(1) * 2);
    let coordinator = Coordinator::new(fetcher, config.crawler.clone(), writer, shutdown);
    let seen = Arc::new(Mutex::new(seen));

    let result = match source {
        Source::Articles(extractor) => {
            let start = id_start.unwrap_or(1);
            coordinator
                .run_id_source(extractor, start, Some(request.count))
                .await
        }
        Source::Listing(extractor) => match page_cursor(site, request.start.unwrap_or(1)) {
            Ok(start) => {
                let count = u32::try_from(request.count).unwrap_or(u32::MAX);
                coordinator
                    .run_listing_source(extractor, start, Some(count), seen)
                    .await
            }
            Err(e) => Err(e),
        },
        Source::DailyArchive(extractor) => {
            let until = request.until.unwrap_or_else(|| Local::now().date_naive());
            let days = u32::try_from(request.count).unwrap_or(u32::MAX);
            let days = ArchiveDay::last_days(until, days);
            coordinator.run_daily_archive(extractor, days, seen).await
        }
    };

    // Dropping the last sender lets the writer drain and hand the store back
    drop(coordinator);
    let (mut store, totals) = handle.await??;

    match result {
        Ok(summary) => {
            store.finish_run(
                run_id,
                RunStatus::from_stop(summary.stop),
                Some(summary.stop),
                totals.records_received as u64,
            )?;
            Ok((
                store,
                CrawlReport {
                    run_id,
                    summary,
                    totals,
                },
            ))
        }
        Err(e) => {
            tracing::error!("Run {} for {} failed: {}", run_id, site, e);
            store.finish_run(run_id, RunStatus::Failed, None, totals.records_received as u64)?;
            Err(e)
        }
    }
}
