//! Listing-page crawls

use crate::common::crawl;
use khabargir::crawler::CrawlRequest;
use khabargir::sites::Site;
use khabargir::state::{CrawlCursor, StopReason};
use khabargir::storage::{NewsRecord, RecordStore, SqliteStorage};
use url::Url;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn voa_listing(articles: &[u32]) -> String {
    let items: String = articles
        .iter()
        .map(|n| {
            format!(
                r#"<li class="archive-list__item">
                     <a class="img-wrap" href="/a/{n}.html"><img src="https://gdb.voanews.com/{n}.jpg"></a>
                     <h4 class="media-block__title">تیتر {n}</h4>
                     <span class="date">۱۳ تیر ۱۴۰۳</span>
                   </li>"#,
                n = n
            )
        })
        .collect();
    format!("<html><body><ul>{}</ul></body></html>", items)
}

const VOA_ARTICLE: &str = r#"<html><body>
    <h1 class="title">گزارش صدای آمریکا</h1>
    <time datetime="2024-07-03T08:38:00+03:30">۱۳ تیر ۱۴۰۳</time>
    <div class="wsw"><p>متن گزارش درباره انتخابات</p></div>
</body></html>"#;

async fn mount_listing(server: &MockServer, page: u32, articles: &[u32]) {
    Mock::given(method("GET"))
        .and(path("/iran-news"))
        .and(query_param("p", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(voa_listing(articles)))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_identical_pages_stop_the_listing() {
    let server = MockServer::start().await;

    for page in 1..=4 {
        mount_listing(&server, page, &[page * 2 - 1, page * 2]).await;
    }
    // The site keeps serving page 5 once it runs out of archive
    for page in 5..=10 {
        mount_listing(&server, page, &[9, 10]).await;
    }
    Mock::given(method("GET"))
        .and(path("/iran-news"))
        .and(query_param("p", "11"))
        .respond_with(ResponseTemplate::new(200).set_body_string(voa_listing(&[9, 10])))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex("^/a/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(VOA_ARTICLE))
        .expect(10)
        .mount(&server)
        .await;

    let mut request = CrawlRequest::new(Site::Voa, 100);
    request.base = Some(Url::parse(&server.uri()).unwrap());

    let (store, report) = crawl(SqliteStorage::new_in_memory().unwrap(), &request).await;

    assert_eq!(report.summary.stop, StopReason::DuplicateLoop);
    assert_eq!(report.summary.attempted, 10);
    assert_eq!(report.summary.accepted, 10);
    assert_eq!(report.summary.last_cursor, Some(CrawlCursor::Page(10)));

    let records = store.load_records().unwrap();
    assert_eq!(records.len(), 10);
    let first = records
        .iter()
        .find(|r| r.link.as_deref() == Some(&format!("{}/a/1.html", server.uri())))
        .unwrap();
    assert_eq!(first.page, Some(1));
    assert_eq!(first.subject.as_deref(), Some("VOA Farsi"));
    assert_eq!(first.title.as_deref(), Some("گزارش صدای آمریکا"));
    assert_eq!(first.gregorian_date.as_deref(), Some("2024-07-03 00:00:00"));
}

#[tokio::test]
async fn test_stored_links_are_not_fetched_again() {
    let server = MockServer::start().await;
    let uri = server.uri();

    let mut store = SqliteStorage::new_in_memory().unwrap();
    store
        .save_batch(vec![NewsRecord {
            link: Some(format!("{}/a/1.html", uri)),
            title: Some("ذخیره شده".to_string()),
            page: Some(1),
            ..Default::default()
        }])
        .unwrap();

    mount_listing(&server, 1, &[1, 2]).await;
    Mock::given(method("GET"))
        .and(path("/a/1.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(VOA_ARTICLE))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a/2.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(VOA_ARTICLE))
        .expect(1)
        .mount(&server)
        .await;

    let mut request = CrawlRequest::new(Site::Voa, 1);
    request.base = Some(Url::parse(&uri).unwrap());

    let (store, report) = crawl(store, &request).await;

    assert_eq!(report.summary.stop, StopReason::IterationCap);
    assert_eq!(report.summary.accepted, 1);
    assert_eq!(store.count_records().unwrap(), 2);

    let kept = store
        .load_records()
        .unwrap()
        .into_iter()
        .find(|r| r.link.as_deref() == Some(&format!("{}/a/1.html", uri)))
        .unwrap();
    assert_eq!(kept.title.as_deref(), Some("ذخیره شده"));
}
