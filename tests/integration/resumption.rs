//! Resuming ID crawls and merging into an existing store

use crate::common::{crawl, hamshahri_article};
use khabargir::crawler::CrawlRequest;
use khabargir::sites::Site;
use khabargir::state::{CrawlCursor, StopReason};
use khabargir::storage::{NewsRecord, RecordStore, RunStatus, SqliteStorage};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_articles(server: &MockServer, ids: std::ops::RangeInclusive<u64>) {
    for id in ids {
        Mock::given(method("GET"))
            .and(path(format!("/news/{}", id)))
            .respond_with(ResponseTemplate::new(200).set_body_string(hamshahri_article(id)))
            .expect(1)
            .mount(server)
            .await;
    }
}

#[tokio::test]
async fn test_second_run_resumes_after_highest_page() {
    let server = MockServer::start().await;
    mount_articles(&server, 1..=5).await;

    let mut first = CrawlRequest::new(Site::Hamshahri, 3);
    first.start = Some(1);
    first.base = Some(Url::parse(&server.uri()).unwrap());

    let (store, report) = crawl(SqliteStorage::new_in_memory().unwrap(), &first).await;
    assert_eq!(report.summary.stop, StopReason::IterationCap);
    assert_eq!(store.max_page().unwrap(), Some(3));

    let mut second = CrawlRequest::new(Site::Hamshahri, 2);
    second.base = first.base.clone();

    let (store, report) = crawl(store, &second).await;
    assert_eq!(report.summary.attempted, 2);
    assert_eq!(report.summary.last_cursor, Some(CrawlCursor::Id(5)));
    assert_eq!(store.max_page().unwrap(), Some(5));
    assert_eq!(store.count_records().unwrap(), 5);

    let run = store.latest_run().unwrap().unwrap();
    assert_eq!(run.id, report.run_id);
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.stop_reason, Some(StopReason::IterationCap));
    assert_eq!(run.records_saved, 2);
}

#[tokio::test]
async fn test_recrawled_article_replaces_stored_row() {
    let server = MockServer::start().await;
    mount_articles(&server, 1..=1).await;

    let mut store = SqliteStorage::new_in_memory().unwrap();
    store
        .save_batch(vec![NewsRecord {
            link: Some(format!("{}/news/1", server.uri())),
            title: Some("تیتر قدیمی".to_string()),
            page: Some(1),
            ..Default::default()
        }])
        .unwrap();

    let mut request = CrawlRequest::new(Site::Hamshahri, 1);
    request.start = Some(1);
    request.base = Some(Url::parse(&server.uri()).unwrap());

    let (store, _) = crawl(store, &request).await;

    let records = store.load_records().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title.as_deref(), Some("خبر شماره 1"));
    assert_eq!(records[0].page, Some(1));
}
