//! Shared fixtures for the integration tests

use khabargir::config::{Config, CrawlerConfig, FetchConfig};
use khabargir::crawler::{crawl_site, CrawlReport, CrawlRequest, HttpFetcher};
use khabargir::storage::SqliteStorage;
use std::sync::Arc;
use tokio::sync::watch;

/// Configuration with default limits and no retry delays
pub fn test_config() -> Config {
    Config {
        crawler: CrawlerConfig {
            workers: 5,
            day_workers: 2,
            empty_streak_limit: 3,
            identical_streak_limit: 5,
            max_pages_per_day: 20,
        },
        fetch: FetchConfig {
            timeout_secs: 5,
            connect_timeout_secs: 5,
            max_retries: 0,
            retry_delay_ms: 1,
            max_backoff_ms: 1,
            ..FetchConfig::default()
        },
        ..Config::default()
    }
}

/// Runs one crawl against an in-memory store
pub async fn crawl(
    store: SqliteStorage,
    request: &CrawlRequest,
) -> (SqliteStorage, CrawlReport) {
    let config = test_config();
    let fetcher = Arc::new(HttpFetcher::new(config.fetch.clone()).expect("client builds"));
    let (_tx, rx) = watch::channel(false);
    crawl_site(fetcher, &config, "test-hash", store, request, rx)
        .await
        .expect("crawl succeeds")
}

/// A Hamshahri article page
pub fn hamshahri_article(id: u64) -> String {
    format!(
        r#"<html><body>
          <ol class="breadcrumb">
            <li class="breadcrumb-item"><a href="/">خانه</a></li>
            <li class="breadcrumb-item"><a href="/service/Iran">ایران</a></li>
          </ol>
          <h1 class="title">خبر شماره {id}</h1>
          <p class="introtext">خلاصه خبر شماره {id}</p>
          <div class="item-date"><span>۱۳ تیر ۱۴۰۳ - ۰۸:۳۸</span></div>
          <div class="item-body"><p>متن کامل خبر شماره {id} درباره بازار و اقتصاد کشور</p></div>
        </body></html>"#,
        id = id
    )
}
