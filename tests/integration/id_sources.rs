//! ID-indexed crawls

use crate::common::{crawl, hamshahri_article};
use khabargir::crawler::CrawlRequest;
use khabargir::sites::Site;
use khabargir::state::{CrawlCursor, StopReason};
use khabargir::storage::{RecordStore, RunStatus, SqliteStorage};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_stops_after_empty_streak_without_overshooting() {
    let server = MockServer::start().await;

    for id in 1..=10 {
        Mock::given(method("GET"))
            .and(path(format!("/news/{}", id)))
            .respond_with(ResponseTemplate::new(200).set_body_string(hamshahri_article(id)))
            .expect(1)
            .mount(&server)
            .await;
    }
    for id in 11..=13 {
        Mock::given(method("GET"))
            .and(path(format!("/news/{}", id)))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/news/14"))
        .respond_with(ResponseTemplate::new(200).set_body_string(hamshahri_article(14)))
        .expect(0)
        .mount(&server)
        .await;

    let mut request = CrawlRequest::new(Site::Hamshahri, 100);
    request.start = Some(1);
    request.base = Some(Url::parse(&server.uri()).unwrap());

    let (store, report) = crawl(SqliteStorage::new_in_memory().unwrap(), &request).await;

    assert_eq!(report.summary.stop, StopReason::Exhausted);
    assert_eq!(report.summary.attempted, 13);
    assert_eq!(report.summary.accepted, 10);
    assert_eq!(report.summary.not_found, 3);
    assert_eq!(report.summary.last_cursor, Some(CrawlCursor::Id(13)));

    assert_eq!(store.count_records().unwrap(), 10);
    let records = store.load_records().unwrap();
    assert_eq!(records[0].page, Some(1));
    assert_eq!(records[0].title.as_deref(), Some("خبر شماره 1"));
    assert_eq!(records[0].subject.as_deref(), Some("ایران"));
    assert_eq!(
        records[0].gregorian_date.as_deref(),
        Some("2024-07-03 08:38:00")
    );
    assert!(records.iter().all(|r| r.keywords.is_some()));

    let run = store.latest_run().unwrap().unwrap();
    assert_eq!(run.site, "hamshahri");
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.stop_reason, Some(StopReason::Exhausted));
    assert_eq!(run.records_saved, 10);
    assert_eq!(run.config_hash, "test-hash");
}

#[tokio::test]
async fn test_kayhan_missing_page_marker_counts_as_not_found() {
    let server = MockServer::start().await;
    let missing = r#"<div class="error_container">صفحه درخواستی شما موجود نمی باشد</div>"#;

    Mock::given(method("GET"))
        .and(path("/fa/news/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<h1 class="title">خبر کیهان</h1><div class="body_news"><p>متن</p></div>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(missing))
        .mount(&server)
        .await;

    let mut request = CrawlRequest::new(Site::Kayhan, 50);
    request.start = Some(1);
    request.base = Some(Url::parse(&server.uri()).unwrap());

    let (store, report) = crawl(SqliteStorage::new_in_memory().unwrap(), &request).await;

    assert_eq!(report.summary.stop, StopReason::Exhausted);
    assert_eq!(report.summary.accepted, 1);
    assert_eq!(report.summary.not_found, 3);
    assert_eq!(store.count_records().unwrap(), 1);
}
