use fetchr::application::builders::RequestBuilder;
use fetchr::application::services::{HttpClient, HttpRequestService};
use fetchr::domain::{ExecutionPolicy, RedirectPolicy, Request};
use fetchr::error::{FetchError, TransportError};
use fetchr::infrastructure::http_client::HyperHttpClient;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn get(url: &str) -> Request {
    RequestBuilder::new().method("get").url(url).build()
}

fn policy(redirect: RedirectPolicy, timeout: Duration) -> ExecutionPolicy {
    ExecutionPolicy {
        timeout: Some(timeout),
        redirect,
        retry_count: 0,
    }
}

/// Server where `/start` redirects to `/final`.
async fn redirecting_server() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/start"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/final"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/final"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("done", "text/plain"))
        .mount(&server)
        .await;

    server
}

#[tokio::test]
async fn stops_at_first_redirect_when_not_following() {
    let server = redirecting_server().await;
    let client = HyperHttpClient::new().unwrap();

    let response = client
        .send(
            &get(&format!("{}/start", server.uri())),
            &policy(RedirectPolicy::StopAtFirst, Duration::from_secs(5)),
        )
        .await
        .unwrap();

    assert_eq!(response.status, "302 Found");
    assert_eq!(response.headers.get("Location"), Some("/final"));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn follows_redirects_when_asked() {
    let server = redirecting_server().await;
    let client = HyperHttpClient::new().unwrap();

    let response = client
        .send(
            &get(&format!("{}/start", server.uri())),
            &policy(RedirectPolicy::FollowAll, Duration::from_secs(5)),
        )
        .await
        .unwrap();

    assert_eq!(response.status, "200 OK");
    assert_eq!(&response.body[..], b"done");
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn endless_redirects_fail_the_attempt() {
    let server = MockServer::start().await;
    Mock::given(path("/loop"))
        .respond_with(ResponseTemplate::new(307).insert_header("Location", "/loop"))
        .mount(&server)
        .await;
    let client = HyperHttpClient::new().unwrap();

    let err = client
        .send(
            &get(&format!("{}/loop", server.uri())),
            &policy(RedirectPolicy::FollowAll, Duration::from_secs(5)),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, TransportError::Redirect(_)));
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;
    let client = HyperHttpClient::new().unwrap();

    let err = client
        .send(
            &get(&server.uri()),
            &policy(RedirectPolicy::StopAtFirst, Duration::from_millis(200)),
        )
        .await
        .unwrap_err();

    assert!(err.is_timeout());
    assert!(err.is_retryable());
}

#[tokio::test]
async fn request_headers_and_body_are_sent_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/echo"))
        .and(header("content-type", "application/json"))
        .and(body_string(r#"{"k":"v"}"#))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    let client = HyperHttpClient::new().unwrap();
    let request = RequestBuilder::new()
        .method("post")
        .url(&format!("{}/echo", server.uri()))
        .headers(&["X-Custom: a".to_string(), "X-Custom: b".to_string()])
        .body(Some(r#"{"k":"v"}"#))
        .unwrap()
        .build();

    let response = client
        .send(&request, &policy(RedirectPolicy::StopAtFirst, Duration::from_secs(5)))
        .await
        .unwrap();

    assert_eq!(response.status, "201 Created");
    let received = server.received_requests().await.unwrap();
    let custom: Vec<_> = received[0].headers.get_all("x-custom").iter().collect();
    assert_eq!(custom, ["a", "b"]);
    assert!(received[0].headers.get("user-agent").is_none());
}

#[tokio::test]
async fn error_status_is_a_response_not_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(500).set_body_raw(r#"{"error":"boom"}"#, "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;
    let service = HyperHttpClient::new().unwrap().create_request_service();
    let mut policy = policy(RedirectPolicy::StopAtFirst, Duration::from_secs(5));
    policy.retry_count = 3;

    let response = service.send_request(&get(&server.uri()), &policy).await.unwrap();

    assert_eq!(response.status, "500 Internal Server Error");
    assert!(response.is_json());
}

#[tokio::test]
async fn server_reason_phrase_is_kept() {
    // mock servers always send the canonical reason, so answer by hand
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 1024];
        let _ = socket.read(&mut buf).await;
        let _ = socket
            .write_all(b"HTTP/1.1 200 Everything Fine\r\nContent-Length: 2\r\nConnection: close\r\n\r\n{}")
            .await;
        let _ = socket.shutdown().await;
    });
    let client = HyperHttpClient::new().unwrap();

    let response = client
        .send(
            &get(&format!("http://{}", addr)),
            &policy(RedirectPolicy::StopAtFirst, Duration::from_secs(5)),
        )
        .await
        .unwrap();

    assert_eq!(response.status, "200 Everything Fine");
}

#[tokio::test]
async fn refused_connection_is_retried_then_surfaced() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let service = HttpRequestService::new(Box::new(HyperHttpClient::new().unwrap()))
        .with_backoff(Duration::from_millis(10));
    let mut policy = policy(RedirectPolicy::StopAtFirst, Duration::from_secs(5));
    policy.retry_count = 2;

    let err = service
        .send_request(&get(&format!("http://{}", addr)), &policy)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        FetchError::Transport {
            attempts: 3,
            source: TransportError::Connection(_)
        }
    ));
}
