//! Daily archive crawls

use crate::common::crawl;
use chrono::NaiveDate;
use khabargir::crawler::CrawlRequest;
use khabargir::sites::Site;
use khabargir::state::StopReason;
use khabargir::storage::{RecordStore, SqliteStorage};
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ARCHIVE: &str = r#"<html><body><ul>
  <li class="news">
    <div class="desc">
      <h3><a href="/fa/news/1">خبر نخست روز</a></h3>
      <p>چکیده نخست</p>
      <time>۱۳ تیر ۱۴۰۳ - ۰۸:۳۸</time>
    </div>
  </li>
  <li class="news">
    <div class="desc">
      <h3><a href="/fa/news/2">خبر دوم روز</a></h3>
      <time>۱۳ تیر ۱۴۰۳ - ۱۰:۰۵</time>
    </div>
  </li>
</ul></body></html>"#;

#[tokio::test]
async fn test_one_day_is_walked_until_its_pages_run_out() {
    let server = MockServer::start().await;

    // 2024-07-03 is 1403/04/13
    Mock::given(method("GET"))
        .and(path("/archive"))
        .and(query_param("pi", "1"))
        .and(query_param("dy", "13"))
        .and(query_param("mn", "4"))
        .and(query_param("yr", "1403"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ARCHIVE))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/archive"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body><ul></ul></body></html>"))
        .expect(3)
        .mount(&server)
        .await;
    for id in 1..=2 {
        Mock::given(method("GET"))
            .and(path(format!("/fa/news/{}", id)))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<li class="breadcrumb-item"><a href="/">خانه</a></li>
                   <li class="breadcrumb-item"><a href="/s">سیاسی</a></li>
                   <div class="body"><p>متن خبر</p></div>"#,
            ))
            .expect(1)
            .mount(&server)
            .await;
    }

    let mut request = CrawlRequest::new(Site::Ettelaat, 1);
    request.base = Some(Url::parse(&server.uri()).unwrap());
    request.until = NaiveDate::from_ymd_opt(2024, 7, 3);

    let (store, report) = crawl(SqliteStorage::new_in_memory().unwrap(), &request).await;

    assert_eq!(report.summary.stop, StopReason::Exhausted);
    assert_eq!(report.summary.attempted, 4);
    assert_eq!(report.summary.accepted, 2);

    let records = store.load_records().unwrap();
    assert_eq!(records.len(), 2);
    let first = records
        .iter()
        .find(|r| r.title.as_deref() == Some("خبر نخست روز"))
        .unwrap();
    assert_eq!(first.subject.as_deref(), Some("سیاسی"));
    assert_eq!(first.description.as_deref(), Some("چکیده نخست"));
    assert_eq!(first.gregorian_date.as_deref(), Some("2024-07-03 08:38:00"));
    assert_eq!(first.page, Some(1));
}
