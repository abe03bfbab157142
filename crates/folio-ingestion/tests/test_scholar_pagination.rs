//! Scholar pagination against a local mock of the aggregation API.

use std::time::{Duration, Instant};

use folio_common::Config;
use folio_ingestion::{FetchError, PublicationAggregator, PublicationType};
use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::{json, Value};

const AUTHOR: &str = "qc6CJjYAAAAJ";

fn articles(offset: usize, n: usize) -> Value {
    let items: Vec<Value> = (0..n)
        .map(|i| {
            let k = offset + i;
            let venue = if k % 2 == 0 { "IEEE Transactions on Robotics" } else { "Proceedings of ICRA" };
            json!({
                "citation_id": format!("{AUTHOR}:{k}"),
                "title": format!("Paper {k}"),
                "link": format!("https://scholar.example/{k}"),
                "authors": "T Taha, J Smith",
                "publication": venue,
                "cited_by": { "value": k },
                "year": format!("{}", 2000 + (k % 5)),
            })
        })
        .collect();
    json!({ "articles": items })
}

fn aggregator(server: &ServerGuard, delay_ms: u64) -> PublicationAggregator {
    let mut cfg = Config::default();
    cfg.scholar.base_url = format!("{}/search.json", server.url());
    cfg.scholar.api_key = "test-key".to_string();
    cfg.scholar.page_delay_ms = delay_ms;
    PublicationAggregator::from_config(&cfg).unwrap()
}

async fn page(server: &mut ServerGuard, start: usize, body: String, hits: usize) -> Mock {
    server
        .mock("GET", "/search.json")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("engine".into(), "google_scholar_author".into()),
            Matcher::UrlEncoded("author_id".into(), AUTHOR.into()),
            Matcher::UrlEncoded("api_key".into(), "test-key".into()),
            Matcher::UrlEncoded("start".into(), start.to_string()),
            Matcher::UrlEncoded("num".into(), "20".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .expect(hits)
        .create_async()
        .await
}

#[tokio::test]
async fn two_pages_make_two_requests_and_25_records() {
    let mut server = Server::new_async().await;
    let p1 = page(&mut server, 0, articles(0, 20).to_string(), 1).await;
    let p2 = page(&mut server, 20, articles(20, 5).to_string(), 1).await;
    let p3 = page(&mut server, 40, articles(40, 5).to_string(), 0).await;

    let pubs = aggregator(&server, 1).fetch_from_google_scholar(Some(AUTHOR)).await;

    p1.assert_async().await;
    p2.assert_async().await;
    p3.assert_async().await;
    assert_eq!(pubs.len(), 25);

    for pair in pubs.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(a.year > b.year || (a.year == b.year && a.citation_count() >= b.citation_count()));
    }
    assert!(pubs.iter().all(|p| p.citations.is_some()));
    assert!(pubs.iter().any(|p| p.kind == PublicationType::Conference));
}

#[tokio::test]
async fn short_first_page_stops_pagination() {
    let mut server = Server::new_async().await;
    let p1 = page(&mut server, 0, articles(0, 7).to_string(), 1).await;
    let p2 = page(&mut server, 20, articles(20, 5).to_string(), 0).await;

    let pubs = aggregator(&server, 0).fetch_from_google_scholar(Some(AUTHOR)).await;

    p1.assert_async().await;
    p2.assert_async().await;
    assert_eq!(pubs.len(), 7);
}

#[tokio::test]
async fn missing_articles_keeps_earlier_pages() {
    let mut server = Server::new_async().await;
    let p1 = page(&mut server, 0, articles(0, 20).to_string(), 1).await;
    let p2 = page(&mut server, 20, json!({ "error": "rate limited" }).to_string(), 1).await;

    let result = aggregator(&server, 0)
        .try_fetch_from_google_scholar(Some(AUTHOR))
        .await
        .expect("malformed page is not an error");

    p1.assert_async().await;
    p2.assert_async().await;
    assert_eq!(result.len(), 20);
}

#[tokio::test]
async fn first_page_without_articles_is_empty_not_error() {
    let mut server = Server::new_async().await;
    let p1 = page(&mut server, 0, json!({ "error": "Invalid API key" }).to_string(), 1).await;
    let p2 = page(&mut server, 20, articles(20, 5).to_string(), 0).await;

    let result = aggregator(&server, 0)
        .try_fetch_from_google_scholar(Some(AUTHOR))
        .await
        .expect("missing articles is not an error");

    p1.assert_async().await;
    p2.assert_async().await;
    assert!(result.is_empty());
}

#[tokio::test]
async fn malformed_first_page_is_empty_not_error() {
    let mut server = Server::new_async().await;
    let p1 = page(&mut server, 0, "<html>upstream busy</html>".to_string(), 1).await;

    let result = aggregator(&server, 0).try_fetch_from_google_scholar(Some(AUTHOR)).await;

    p1.assert_async().await;
    assert!(matches!(result, Ok(ref v) if v.is_empty()));
}

#[tokio::test]
async fn articles_not_an_array_stops() {
    let mut server = Server::new_async().await;
    let p1 = page(&mut server, 0, json!({ "articles": "none" }).to_string(), 1).await;

    let pubs = aggregator(&server, 0).fetch_from_google_scholar(Some(AUTHOR)).await;

    p1.assert_async().await;
    assert!(pubs.is_empty());
}

#[tokio::test]
async fn http_error_is_reported_by_try_and_swallowed_by_fetch() {
    let mut server = Server::new_async().await;
    let failing = server
        .mock("GET", "/search.json")
        .match_query(Matcher::Any)
        .with_status(503)
        .expect(2)
        .create_async()
        .await;

    let agg = aggregator(&server, 0);
    let err = agg.try_fetch_from_google_scholar(Some(AUTHOR)).await.unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 503, .. }));
    assert!(agg.fetch_from_google_scholar(Some(AUTHOR)).await.is_empty());

    failing.assert_async().await;
}

#[tokio::test]
async fn pause_between_pages() {
    let mut server = Server::new_async().await;
    let _p1 = page(&mut server, 0, articles(0, 20).to_string(), 1).await;
    let _p2 = page(&mut server, 20, articles(20, 20).to_string(), 1).await;
    let _p3 = page(&mut server, 40, articles(40, 0).to_string(), 1).await;

    let started = Instant::now();
    let pubs = aggregator(&server, 50).fetch_from_google_scholar(Some(AUTHOR)).await;

    assert_eq!(pubs.len(), 40);
    // Two pauses: after page 1 and after page 2.
    assert!(started.elapsed() >= Duration::from_millis(100));
}

#[tokio::test]
async fn missing_fields_get_placeholders() {
    let mut server = Server::new_async().await;
    let body = json!({ "articles": [ { "year": "unknown" } ] }).to_string();
    let _p1 = page(&mut server, 0, body, 1).await;

    let pubs = aggregator(&server, 0).fetch_from_google_scholar(Some(AUTHOR)).await;

    assert_eq!(pubs.len(), 1);
    let p = &pubs[0];
    assert_eq!(p.title, "Untitled");
    assert_eq!(p.authors, "Unknown Authors");
    assert_eq!(p.venue, "Unknown Publication");
    assert_eq!(p.url, "#");
    assert_eq!(p.year, 0);
    assert_eq!(p.citations, Some(0));
    assert_eq!(p.kind, PublicationType::Other);
    assert!(!p.id.is_empty());
}
