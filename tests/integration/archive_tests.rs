//! Integration tests for the archive index client
//!
//! A wiremock server stands in for the CDX endpoint.

use linkrot::archive::ArchiveIndex;
use linkrot::config::ArchiveConfig;
use linkrot::LinkRotError;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HEADER: &str =
    r#"["urlkey","timestamp","original","mimetype","statuscode","digest","length"]"#;

fn cdx_body(rows: &[&str]) -> String {
    let mut all = vec![HEADER];
    all.extend_from_slice(rows);
    format!("[{}]", all.join(","))
}

fn archive_config(server: &MockServer) -> ArchiveConfig {
    ArchiveConfig {
        index_url: format!("{}/cdx/search/cdx", server.uri()),
        snapshot_url: "http://snapshots.test/web/".to_string(),
    }
}

fn index_for(server: &MockServer, url: &str) -> ArchiveIndex {
    ArchiveIndex::new(reqwest::Client::new(), &archive_config(server), url)
        .expect("Failed to create archive index")
}

#[tokio::test]
async fn test_skips_invalid_captures() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cdx/search/cdx"))
        .and(query_param("url", "example.com/a"))
        .and(query_param("output", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(cdx_body(&[
            r#"["com,example)/a","20100101000000","http://example.com/a","text/html","200","D1","100"]"#,
            r#"["com,example)/a","20150101000000","http://example.com/a","text/html","404","D2","50"]"#,
        ])))
        .mount(&server)
        .await;

    let index = index_for(&server, "http://example.com/a");

    let first = index.first_valid_entry().await.unwrap().unwrap();
    let last = index.last_valid_entry().await.unwrap().unwrap();

    assert_eq!(first.timestamp, "20100101000000");
    assert_eq!(last, first);
    assert_eq!(index.entries().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_first_and_last_valid_differ() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cdx/search/cdx"))
        .respond_with(ResponseTemplate::new(200).set_body_string(cdx_body(&[
            r#"["k","20090101000000","http://example.com/","text/html","200","D1","1"]"#,
            r#"["k","20120101000000","http://example.com/","text/html","200","D2","1"]"#,
            r#"["k","20180101000000","http://example.com/","text/html","301","D3","1"]"#,
        ])))
        .mount(&server)
        .await;

    let index = index_for(&server, "http://example.com/");

    let first = index.first_valid_entry().await.unwrap().unwrap();
    assert_eq!(first.timestamp, "20090101000000");

    let last = index.last_valid_entry().await.unwrap().unwrap();
    assert_eq!(last.timestamp, "20120101000000");
    assert_eq!(
        index.archived_url(last),
        "http://snapshots.test/web/20120101000000/http://example.com/"
    );
}

#[tokio::test]
async fn test_no_captures() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cdx/search/cdx"))
        .respond_with(ResponseTemplate::new(200).set_body_string(cdx_body(&[])))
        .mount(&server)
        .await;

    let index = index_for(&server, "http://example.com/never");

    assert!(index.entries().await.unwrap().is_empty());
    assert!(index.first_valid_entry().await.unwrap().is_none());
    assert!(index.last_valid_entry().await.unwrap().is_none());
}

#[tokio::test]
async fn test_empty_body_means_no_captures() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cdx/search/cdx"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let index = index_for(&server, "http://example.com/");
    assert!(index.entries().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_index_http_error_means_no_captures() {
    for status in [404u16, 503] {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/cdx/search/cdx"))
            .respond_with(ResponseTemplate::new(status))
            .expect(1)
            .mount(&server)
            .await;

        let index = index_for(&server, "http://example.com/");
        assert!(index.entries().await.unwrap().is_empty());
        assert!(index.last_valid_entry().await.unwrap().is_none());
    }
}

#[tokio::test]
async fn test_entries_are_fetched_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cdx/search/cdx"))
        .respond_with(ResponseTemplate::new(200).set_body_string(cdx_body(&[
            r#"["k","20100101000000","http://example.com/","text/html","200","D1","1"]"#,
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let index = index_for(&server, "http://example.com/");

    for _ in 0..3 {
        assert_eq!(index.entries().await.unwrap().len(), 1);
    }
    assert!(index.first_valid_entry().await.unwrap().is_some());
    assert!(index.last_valid_entry().await.unwrap().is_some());
}

#[tokio::test]
async fn test_scheme_is_stripped_from_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cdx/search/cdx"))
        .and(query_param("url", "example.com/secure?page=2"))
        .and(query_param("output", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(cdx_body(&[])))
        .expect(1)
        .mount(&server)
        .await;

    let index = index_for(&server, "https://example.com/secure?page=2");
    assert!(index.entries().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_body_is_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cdx/search/cdx"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let index = index_for(&server, "http://example.com/");
    assert!(matches!(index.entries().await, Err(LinkRotError::Json(_))));
}

#[tokio::test]
async fn test_unreachable_index_is_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = ArchiveConfig {
        index_url: format!("http://127.0.0.1:{}/cdx", port),
        ..ArchiveConfig::default()
    };
    let index = ArchiveIndex::new(reqwest::Client::new(), &config, "http://example.com/").unwrap();

    assert!(matches!(
        index.entries().await,
        Err(LinkRotError::Http { .. })
    ));
}
