//! End-to-end tests of `Client` over the reqwest transport against a
//! local mock server.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, HeaderName, HeaderValue};
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{body_json, body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use netcall::config::ClientConfig;
use netcall::logging::{EventKind, LogEvent, LogSink};
use netcall::pipeline::RetryPolicy;
use netcall::time::InstantSleeper;
use netcall::transport::{HttpError, ReqwestClient};
use netcall::{CallError, Client};

#[derive(Default)]
struct CollectingSink {
    events: Mutex<Vec<LogEvent>>,
}

impl LogSink for CollectingSink {
    fn emit(&self, event: &LogEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

fn client(config: ClientConfig) -> Client<ReqwestClient, InstantSleeper> {
    Client::new(config).unwrap().with_sleeper(InstantSleeper)
}

fn retrying(max_retries: u32) -> Client<ReqwestClient, InstantSleeper> {
    client(ClientConfig::new(Duration::from_secs(5)).with_retry(
        RetryPolicy::new()
            .with_max_retries(max_retries)
            .with_retry_delay(Duration::from_millis(10)),
    ))
}

#[tokio::test]
async fn get_merges_params_into_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "new"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("found"))
        .expect(1)
        .mount(&server)
        .await;

    let body = retrying(0)
        .get(
            "search",
            &format!("{}/search?page=1&q=old", server.uri()),
            [("q", "new")],
            HeaderMap::new(),
        )
        .await
        .unwrap();

    assert_eq!(body, "found");
}

#[tokio::test]
async fn post_sends_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .and(body_json(json!({"name": "ann", "roles": ["admin"]})))
        .respond_with(ResponseTemplate::new(201).set_body_string(r#"{"id":7}"#))
        .expect(1)
        .mount(&server)
        .await;

    let body = retrying(0)
        .post(
            "create user",
            &format!("{}/users", server.uri()),
            &json!({"name": "ann", "roles": ["admin"]}),
            HeaderMap::new(),
        )
        .await
        .unwrap();

    assert_eq!(body, r#"{"id":7}"#);
}

#[tokio::test]
async fn text_payload_is_sent_quoted() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(body_string(r#""hello""#))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    retrying(0)
        .put_text("note", &server.uri(), "hello", HeaderMap::new())
        .await
        .unwrap();
}

#[tokio::test]
async fn xml_payload_gets_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("content-type", "text/xml; charset=UTF-8"))
        .and(body_string("<ping/>"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<pong/>"))
        .expect(1)
        .mount(&server)
        .await;

    let body = retrying(0)
        .post_xml("ping", &server.uri(), "<ping/>", HeaderMap::new())
        .await
        .unwrap();

    assert_eq!(body, "<pong/>");
}

#[tokio::test]
async fn xml_keeps_caller_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("content-type", "application/soap+xml"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/soap+xml"));

    retrying(0)
        .post_xml("soap", &server.uri(), "<env/>", headers)
        .await
        .unwrap();
}

#[tokio::test]
async fn server_error_is_retried_until_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .with_priority(1)
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ready"))
        .with_priority(2)
        .expect(1)
        .mount(&server)
        .await;

    let body = retrying(3)
        .get("poll", &server.uri(), [("a", "1")], HeaderMap::new())
        .await
        .unwrap();

    assert_eq!(body, "ready");
}

#[tokio::test]
async fn too_many_requests_is_not_retried_by_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .expect(1)
        .mount(&server)
        .await;

    let error = retrying(3)
        .get("limited", &server.uri(), [("a", "1")], HeaderMap::new())
        .await
        .unwrap_err();

    assert_eq!(error.to_string(), "received non-2xx response code: 429");
    assert_eq!(error.body(), Some("slow down"));
}

#[tokio::test]
async fn exhausted_retries_return_last_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(3)
        .mount(&server)
        .await;

    let error = retrying(2)
        .delete("remove", &server.uri(), [("id", "1")], HeaderMap::new())
        .await
        .unwrap_err();

    assert_eq!(error.body(), Some("boom"));
}

#[tokio::test]
async fn repeated_headers_reach_the_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    let name = HeaderName::from_static("x-tag");
    let mut headers = HeaderMap::new();
    headers.append(name.clone(), HeaderValue::from_static("a"));
    headers.append(name.clone(), HeaderValue::from_static("b"));

    let none: [(&str, &str); 0] = [];
    retrying(0)
        .get("tags", &server.uri(), none, headers)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let values: Vec<_> = requests[0]
        .headers
        .get_all(&name)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    assert_eq!(values, vec!["a", "b"]);
}

#[tokio::test]
async fn sanitized_logs_do_not_change_the_wire() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("authorization", "Bearer abcdef1234567890"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let sink = Arc::new(CollectingSink::default());
    let client = retrying(0).with_log_sink(sink.clone());
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_static("Bearer abcdef1234567890"),
    );

    let none: [(&str, &str); 0] = [];
    client
        .get("secret", &server.uri(), none, headers)
        .await
        .unwrap();

    let events = sink.events.lock().unwrap();
    let logged = events
        .iter()
        .find_map(|e| match &e.kind {
            EventKind::Request { headers, .. } => headers.clone(),
            _ => None,
        })
        .unwrap();
    assert_eq!(logged, r#"{"authorization":"Bearer abc..."}"#);
}

#[tokio::test]
async fn slow_server_hits_the_deadline() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;
    let client = client(ClientConfig::new(Duration::from_millis(300)));

    let none: [(&str, &str); 0] = [];
    let error = client
        .get("slow", &server.uri(), none, HeaderMap::new())
        .await
        .unwrap_err();

    // The transport timeout and the call deadline share the same budget
    assert!(
        matches!(
            error,
            CallError::Deadline { .. } | CallError::Transport(HttpError::Timeout)
        ),
        "unexpected error: {error:?}"
    );
}

#[tokio::test]
async fn refused_connection_is_a_transport_error() {
    let error = retrying(1)
        .get("closed", "http://127.0.0.1:9/", [("a", "1")], HeaderMap::new())
        .await
        .unwrap_err();

    assert!(
        matches!(error, CallError::Transport(HttpError::Connection(_))),
        "unexpected error: {error:?}"
    );
}

/// Accepts connections and answers each with a plain-HTTP response.
async fn plain_http_listener() -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let connections = Arc::new(AtomicUsize::new(0));

    let counter = connections.clone();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            let _ = socket
                .write_all(b"HTTP/1.1 400 Bad Request\r\ncontent-length: 0\r\n\r\n")
                .await;
            let _ = socket.shutdown().await;
        }
    });

    (format!("https://{addr}/"), connections)
}

#[tokio::test]
async fn tls_failure_is_not_retried() {
    let (url, connections) = plain_http_listener().await;
    let sink = Arc::new(CollectingSink::default());
    let client = retrying(2).with_log_sink(sink.clone());

    let none: [(&str, &str); 0] = [];
    let error = client
        .get("plain server", &url, none, HeaderMap::new())
        .await
        .unwrap_err();

    assert!(
        matches!(error, CallError::Transport(HttpError::Tls(_))),
        "unexpected error: {error:?}"
    );
    assert_eq!(connections.load(Ordering::SeqCst), 1);

    let events = sink.events.lock().unwrap();
    let requests = events
        .iter()
        .filter(|e| matches!(e.kind, EventKind::Request { .. }))
        .count();
    assert_eq!(requests, 1);
}

#[tokio::test]
async fn malformed_url_fails_before_sending() {
    let error = retrying(3)
        .post("bad", "://nope", &json!({}), HeaderMap::new())
        .await
        .unwrap_err();

    assert!(matches!(error, CallError::InvalidUrl { .. }));
}
