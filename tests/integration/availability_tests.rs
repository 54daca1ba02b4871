//! Integration tests for the availability check
//!
//! These tests use wiremock servers to exercise redirect following and
//! failure classification end-to-end.

use linkrot::availability::{Availability, AvailabilityOutcome};
use linkrot::config::{Config, HeaderRule, DEFAULT_USER_AGENT};
use linkrot::LinkRotError;
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};
use wiremock::matchers::{header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn availability() -> Availability {
    Availability::new(&Config::default()).expect("Failed to build availability checker")
}

/// Accepts one connection, reads the request, then hands the socket to `close`
async fn serve_once<F>(close: F) -> String
where
    F: FnOnce(TcpStream) + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 1024];
        let _ = stream.read(&mut buf).await;
        close(stream);
    });

    format!("http://{}/x", addr)
}

fn redirect_to(status: u16, location: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).insert_header("Location", location)
}

#[tokio::test]
async fn test_direct_success_is_available() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/ok", server.uri());
    let outcome = availability().check(&url).await.unwrap();

    assert_eq!(outcome, AvailabilityOutcome::Available { final_url: url });
}

#[tokio::test]
async fn test_redirect_chain_makes_one_request_per_hop() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(redirect_to(301, &format!("{}/b", base)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(redirect_to(302, "/c"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/c"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = availability().check(&format!("{}/a", base)).await.unwrap();

    assert_eq!(
        outcome,
        AvailabilityOutcome::Redirected {
            final_url: format!("{}/c", base)
        }
    );
}

#[tokio::test]
async fn test_cross_host_redirect() {
    let origin = MockServer::start().await;
    let destination = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(redirect_to(301, &format!("{}/b", destination.uri())))
        .expect(1)
        .mount(&origin)
        .await;

    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&destination)
        .await;

    let outcome = availability()
        .check(&format!("{}/a", origin.uri()))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        AvailabilityOutcome::Redirected {
            final_url: format!("{}/b", destination.uri())
        }
    );
}

#[tokio::test]
async fn test_relative_location_uses_previous_hop_host() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/start"))
        .respond_with(redirect_to(301, &format!("{}/moved/here", second.uri())))
        .expect(1)
        .mount(&first)
        .await;

    // A relative redirect must not go back to the first server.
    Mock::given(method("GET"))
        .and(path("/final"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&first)
        .await;

    Mock::given(method("GET"))
        .and(path("/moved/here"))
        .respond_with(redirect_to(302, "/final"))
        .expect(1)
        .mount(&second)
        .await;

    Mock::given(method("GET"))
        .and(path("/final"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&second)
        .await;

    let outcome = availability()
        .check(&format!("{}/start", first.uri()))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        AvailabilityOutcome::Redirected {
            final_url: format!("{}/final", second.uri())
        }
    );
}

#[tokio::test]
async fn test_redirect_loop_stops_at_limit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(redirect_to(302, "/loop"))
        .expect(5)
        .mount(&server)
        .await;

    let url = format!("{}/loop", server.uri());
    let outcome = availability().check(&url).await.unwrap();

    assert_eq!(
        outcome,
        AvailabilityOutcome::TooManyRedirects {
            last_url: url,
            hop_count: 5
        }
    );
}

#[tokio::test]
async fn test_chain_one_shorter_than_limit_succeeds() {
    let server = MockServer::start().await;

    for hop in 1..=4 {
        Mock::given(method("GET"))
            .and(path(format!("/hop{}", hop)))
            .respond_with(redirect_to(302, &format!("/hop{}", hop + 1)))
            .expect(1)
            .mount(&server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/hop5"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = availability()
        .check(&format!("{}/hop1", server.uri()))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        AvailabilityOutcome::Redirected {
            final_url: format!("{}/hop5", server.uri())
        }
    );
}

#[tokio::test]
async fn test_custom_redirect_limit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/r1"))
        .respond_with(redirect_to(302, "/r2"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/r2"))
        .respond_with(redirect_to(302, "/r3"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/r3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = availability()
        .with_redirect_limit(2)
        .check(&format!("{}/r1", server.uri()))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        AvailabilityOutcome::TooManyRedirects {
            last_url: format!("{}/r3", server.uri()),
            hop_count: 2
        }
    );
}

#[tokio::test]
async fn test_chain_returning_to_original_url_reports_available() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(redirect_to(302, "/b"))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(redirect_to(302, "/a"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let url = format!("{}/a", base);
    let outcome = availability().check(&url).await.unwrap();

    // The final URL is compared with the requested one, not the previous hop.
    assert_eq!(outcome, AvailabilityOutcome::Available { final_url: url });
}

#[tokio::test]
async fn test_http_errors_are_server_problems() {
    let server = MockServer::start().await;

    for code in [403u16, 404, 410, 500, 503] {
        Mock::given(method("GET"))
            .and(path(format!("/status/{}", code)))
            .respond_with(ResponseTemplate::new(code))
            .mount(&server)
            .await;
    }

    let availability = availability();
    for code in [403u16, 404, 410, 500, 503] {
        let outcome = availability
            .check(&format!("{}/status/{}", server.uri(), code))
            .await
            .unwrap();
        assert_eq!(outcome, AvailabilityOutcome::ServerProblem { status_code: code });
    }
}

#[tokio::test]
async fn test_error_after_redirect_is_server_problem() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(redirect_to(301, "/gone"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&server)
        .await;

    let outcome = availability()
        .check(&format!("{}/old", server.uri()))
        .await
        .unwrap();

    assert_eq!(outcome, AvailabilityOutcome::ServerProblem { status_code: 410 });
}

#[tokio::test]
async fn test_refused_connection_is_connection_problem() {
    // Reserve a port, then free it so nothing is listening there.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let outcome = availability()
        .check(&format!("http://127.0.0.1:{}/nothing", port))
        .await
        .unwrap();

    match outcome {
        AvailabilityOutcome::ConnectionProblem { message } => assert!(!message.is_empty()),
        other => panic!("Expected ConnectionProblem, got {:?}", other),
    }
}

#[tokio::test]
async fn test_closed_without_response_is_connection_problem() {
    let url = serve_once(drop).await;

    let outcome = availability().check(&url).await.unwrap();

    match outcome {
        AvailabilityOutcome::ConnectionProblem { message } => assert!(!message.is_empty()),
        other => panic!("Expected ConnectionProblem, got {:?}", other),
    }
}

#[tokio::test]
async fn test_reset_by_peer_is_connection_problem() {
    let url = serve_once(|stream| {
        // Zero linger turns the close into a RST
        socket2::SockRef::from(&stream)
            .set_linger(Some(Duration::ZERO))
            .unwrap();
        drop(stream);
    })
    .await;

    let outcome = availability().check(&url).await.unwrap();

    match outcome {
        AvailabilityOutcome::ConnectionProblem { message } => assert!(!message.is_empty()),
        other => panic!("Expected ConnectionProblem, got {:?}", other),
    }
}

#[tokio::test]
async fn test_timeout_is_connection_problem() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let mut config = Config::default();
    config.http.timeout_secs = 1;
    let availability = Availability::new(&config).unwrap();

    let outcome = availability
        .check(&format!("{}/slow", server.uri()))
        .await
        .unwrap();

    match outcome {
        AvailabilityOutcome::ConnectionProblem { message } => assert!(!message.is_empty()),
        other => panic!("Expected ConnectionProblem, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_characters_are_escaped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex("^/search/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = availability()
        .check(&format!("{}/search/{{a}}|b^[c]`d`", server.uri()))
        .await
        .unwrap();

    match outcome {
        AvailabilityOutcome::Available { final_url } => {
            assert!(final_url.contains("%7Ba%7D%7Cb%5E%5Bc%5D%60d%60"));
        }
        other => panic!("Expected Available, got {:?}", other),
    }
}

#[tokio::test]
async fn test_redirect_without_location_is_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/nowhere"))
        .respond_with(ResponseTemplate::new(302))
        .mount(&server)
        .await;

    let result = availability()
        .check(&format!("{}/nowhere", server.uri()))
        .await;

    assert!(matches!(
        result,
        Err(LinkRotError::MissingLocation { status: 302, .. })
    ));
}

#[tokio::test]
async fn test_unsupported_scheme_is_fatal() {
    let result = availability().check("ftp://example.com/file").await;
    assert!(matches!(result, Err(LinkRotError::Url(_))));
}

#[tokio::test]
async fn test_sends_user_agent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ua"))
        .and(header("user-agent", DEFAULT_USER_AGENT))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = availability()
        .check(&format!("{}/ua", server.uri()))
        .await
        .unwrap();

    assert!(matches!(outcome, AvailabilityOutcome::Available { .. }));
}

#[tokio::test]
async fn test_extra_headers_for_matching_host() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/private"))
        .and(header("cookie", "session=abc"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut headers = BTreeMap::new();
    headers.insert("Cookie".to_string(), "session=abc".to_string());

    let mut config = Config::default();
    config.extra_headers.push(HeaderRule {
        host: "127.0.0.1".to_string(),
        headers,
    });

    let outcome = Availability::new(&config)
        .unwrap()
        .check(&format!("{}/private", server.uri()))
        .await
        .unwrap();

    assert!(matches!(outcome, AvailabilityOutcome::Available { .. }));
}

#[tokio::test]
async fn test_extra_headers_not_sent_to_other_hosts() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/private"))
        .and(header("cookie", "session=abc"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut headers = BTreeMap::new();
    headers.insert("Cookie".to_string(), "session=abc".to_string());

    let mut config = Config::default();
    config.extra_headers.push(HeaderRule {
        host: "*.linkedin.com".to_string(),
        headers,
    });

    let outcome = Availability::new(&config)
        .unwrap()
        .check(&format!("{}/private", server.uri()))
        .await
        .unwrap();

    assert_eq!(outcome, AvailabilityOutcome::ServerProblem { status_code: 404 });
}
