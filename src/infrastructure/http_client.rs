use crate::application::services::{HttpClient, HttpRequestService};
use crate::domain::{ExecutionPolicy, Headers, RedirectPolicy, Request, Response};
use crate::error::{TransportError, error_chain};

use anyhow::{Context, Result};
use async_trait::async_trait;
use http::{HeaderMap, Method, StatusCode, Uri};
use http_body_util::{BodyExt, Full};
use hyper::Request as HyperRequest;
use hyper::body::{Bytes, Incoming};
use hyper::ext::ReasonPhrase;
use hyper::header::LOCATION;
use hyper_tls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;

/// Hop limit when redirects are followed.
pub const MAX_REDIRECTS: usize = 10;

type TransportResult<T> = std::result::Result<T, TransportError>;

/// Infrastructure implementation of HttpClient using Hyper
/// This is a low-level HTTP transport that the application service uses
pub struct HyperHttpClient {
    client: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
}

impl HyperHttpClient {
    pub fn new() -> Result<Self> {
        let mut connector = HttpConnector::new();
        connector.enforce_http(false);
        let tls = tokio_native_tls::native_tls::TlsConnector::new()
            .context("Failed to initialise TLS")?;
        let https = HttpsConnector::from((connector, tokio_native_tls::TlsConnector::from(tls)));
        let client = Client::builder(TokioExecutor::new()).build(https);
        Ok(Self { client })
    }

    /// Creates a configured HTTP request service using this client
    pub fn create_request_service(self) -> HttpRequestService {
        HttpRequestService::new(Box::new(self))
    }
}

#[async_trait]
impl HttpClient for HyperHttpClient {
    async fn send(&self, request: &Request, policy: &ExecutionPolicy) -> TransportResult<Response> {
        let exchange = self.exchange(request, policy.redirect);
        match policy.timeout {
            Some(limit) => tokio::time::timeout(limit, exchange)
                .await
                .map_err(|_| TransportError::Timeout(limit))?,
            None => exchange.await,
        }
    }
}

impl HyperHttpClient {
    /// One attempt: the request, any redirects the policy allows, and the
    /// full body read.
    async fn exchange(&self, request: &Request, redirect: RedirectPolicy) -> TransportResult<Response> {
        let mut outgoing = OutgoingRequest::from_domain(request)?;

        loop {
            let hyper_request = RequestAdapter::to_hyper_request(&outgoing)?;
            let hyper_response = self.execute_http_request(hyper_request).await?;

            if redirect == RedirectPolicy::FollowAll
                && RedirectAdapter::is_followable(hyper_response.status())
            {
                if let Some(location) = RedirectAdapter::location(hyper_response.headers()) {
                    tracing::debug!(
                        status = %hyper_response.status(),
                        location = %location,
                        "Following redirect"
                    );
                    outgoing.redirect(hyper_response.status(), &location)?;
                    continue;
                }
            }

            return ResponseAdapter::to_domain_response(hyper_response).await;
        }
    }

    async fn execute_http_request(
        &self,
        request: HyperRequest<Full<Bytes>>,
    ) -> TransportResult<hyper::Response<Incoming>> {
        self.client.request(request).await.map_err(|e| {
            if e.is_connect() {
                TransportError::Connection(error_chain(&e))
            } else {
                TransportError::Request(error_chain(&e))
            }
        })
    }
}

/// Transport-side view of a request, rewritten as redirects are followed
struct OutgoingRequest {
    method: Method,
    uri: Uri,
    headers: Headers,
    body: Bytes,
    hops: usize,
}

impl OutgoingRequest {
    fn from_domain(request: &Request) -> TransportResult<Self> {
        let method = Method::from_bytes(request.method.as_str().as_bytes()).map_err(|_| {
            TransportError::InvalidRequest(format!("Invalid HTTP method: '{}'", request.method))
        })?;
        let uri = request
            .url
            .as_str()
            .parse::<Uri>()
            .map_err(|e| TransportError::InvalidRequest(format!("Invalid URL: {}", e)))?;

        Ok(Self {
            method,
            uri,
            headers: request.headers.clone(),
            body: Bytes::copy_from_slice(request.body.as_bytes()),
            hops: 0,
        })
    }

    fn redirect(&mut self, status: StatusCode, location: &str) -> TransportResult<()> {
        if self.hops >= MAX_REDIRECTS {
            return Err(TransportError::Redirect(format!(
                "stopped after {} redirects",
                MAX_REDIRECTS
            )));
        }

        let next = RedirectAdapter::resolve(&self.uri, location)?;

        if RedirectAdapter::switches_to_get(status, &self.method) {
            self.method = Method::GET;
            self.body = Bytes::new();
            self.headers.remove("Content-Type");
            self.headers.remove("Content-Length");
        }

        if next.host() != self.uri.host() {
            self.headers.remove("Authorization");
            self.headers.remove("Cookie");
        }

        self.uri = next;
        self.hops += 1;
        Ok(())
    }
}

/// Adapter for converting domain requests to Hyper requests
struct RequestAdapter;

impl RequestAdapter {
    /// Copies headers verbatim; nothing is added or removed here.
    fn to_hyper_request(outgoing: &OutgoingRequest) -> TransportResult<HyperRequest<Full<Bytes>>> {
        let mut builder = HyperRequest::builder()
            .method(outgoing.method.clone())
            .uri(outgoing.uri.clone());

        for (name, values) in outgoing.headers.iter() {
            for value in values {
                builder = builder.header(name, value.as_str());
            }
        }

        builder
            .body(Full::new(outgoing.body.clone()))
            .map_err(|e| TransportError::InvalidRequest(format!("Failed to build HTTP request: {}", e)))
    }
}

/// Adapter for converting domain responses from Hyper responses
struct ResponseAdapter;

impl ResponseAdapter {
    async fn to_domain_response(hyper_response: hyper::Response<Incoming>) -> TransportResult<Response> {
        let status = Self::status_line(
            hyper_response.status(),
            hyper_response.extensions().get::<ReasonPhrase>(),
        );
        let headers = HeaderAdapter::to_domain_headers(hyper_response.headers());
        let body = Self::extract_response_body(hyper_response).await?;

        Ok(Response { status, headers, body })
    }

    async fn extract_response_body(response: hyper::Response<Incoming>) -> TransportResult<Bytes> {
        response
            .into_body()
            .collect()
            .await
            .map(|collected| collected.to_bytes())
            .map_err(|e| TransportError::Body(error_chain(&e)))
    }

    /// `"<code> <reason>"`, preferring the reason phrase the server sent.
    fn status_line(status: StatusCode, reason: Option<&ReasonPhrase>) -> String {
        let reason = match reason {
            Some(phrase) => String::from_utf8_lossy(phrase.as_bytes()).into_owned(),
            None => status.canonical_reason().unwrap_or_default().to_string(),
        };

        if reason.is_empty() {
            status.as_str().to_string()
        } else {
            format!("{} {}", status.as_str(), reason)
        }
    }
}

/// Adapter for handling HTTP headers
struct HeaderAdapter;

impl HeaderAdapter {
    fn to_domain_headers(map: &HeaderMap) -> Headers {
        let mut headers = Headers::new();
        for (name, value) in map {
            headers.append(name.as_str(), String::from_utf8_lossy(value.as_bytes()));
        }
        headers
    }
}

/// Adapter for redirect decisions
struct RedirectAdapter;

impl RedirectAdapter {
    fn is_followable(status: StatusCode) -> bool {
        matches!(status.as_u16(), 301 | 302 | 303 | 307 | 308)
    }

    fn location(headers: &HeaderMap) -> Option<String> {
        headers
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    }

    /// 301, 302 and 303 turn anything but GET and HEAD into a bodiless GET.
    fn switches_to_get(status: StatusCode, method: &Method) -> bool {
        matches!(status.as_u16(), 301..=303) && *method != Method::GET && *method != Method::HEAD
    }

    fn resolve(base: &Uri, location: &str) -> TransportResult<Uri> {
        let base = url::Url::parse(&base.to_string())
            .map_err(|e| TransportError::Redirect(format!("Invalid base URL: {}", e)))?;
        let next = base
            .join(location)
            .map_err(|e| TransportError::Redirect(format!("Invalid location '{}': {}", location, e)))?;
        next.as_str()
            .parse::<Uri>()
            .map_err(|e| TransportError::Redirect(format!("Invalid location '{}': {}", location, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::builders::RequestBuilder;

    fn outgoing(method: &str, url: &str, body: Option<&str>, headers: &[&str]) -> OutgoingRequest {
        let headers: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
        let request = RequestBuilder::new()
            .method(method)
            .url(url)
            .headers(&headers)
            .body(body)
            .unwrap()
            .build();
        OutgoingRequest::from_domain(&request).unwrap()
    }

    #[test]
    fn status_line_uses_canonical_reason() {
        assert_eq!(ResponseAdapter::status_line(StatusCode::OK, None), "200 OK");
        assert_eq!(
            ResponseAdapter::status_line(StatusCode::NOT_FOUND, None),
            "404 Not Found"
        );
        let unknown = StatusCode::from_u16(599).unwrap();
        assert_eq!(ResponseAdapter::status_line(unknown, None), "599");
    }

    #[test]
    fn response_headers_are_canonicalized_and_grouped() {
        let mut map = HeaderMap::new();
        map.append("set-cookie", "a=1".parse().unwrap());
        map.append("set-cookie", "b=2".parse().unwrap());
        map.append("content-type", "text/plain".parse().unwrap());

        let headers = HeaderAdapter::to_domain_headers(&map);
        assert_eq!(headers.get_all("Set-Cookie"), ["a=1", "b=2"]);
        assert_eq!(headers.get("Content-Type"), Some("text/plain"));
    }

    #[test]
    fn hyper_request_carries_headers_verbatim() {
        let outgoing = outgoing(
            "post",
            "http://example.com/items",
            Some("{}"),
            &["Accept: a", "Accept: b"],
        );
        let request = RequestAdapter::to_hyper_request(&outgoing).unwrap();

        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.uri(), "http://example.com/items");
        let accept: Vec<_> = request.headers().get_all("accept").iter().collect();
        assert_eq!(accept, ["a", "b"]);
        assert_eq!(
            request.headers()["content-type"].to_str().unwrap(),
            "application/json"
        );
        assert_eq!(request.headers().len(), 3);
    }

    #[test]
    fn invalid_url_is_not_retryable() {
        let request = RequestBuilder::new().url("http://exa mple.com").build();
        let err = OutgoingRequest::from_domain(&request).err().unwrap();
        assert!(!err.is_retryable());
    }

    #[test]
    fn see_other_turns_post_into_get() {
        let mut outgoing = outgoing("post", "http://example.com/form", Some("{}"), &[]);
        outgoing.redirect(StatusCode::SEE_OTHER, "/done").unwrap();

        assert_eq!(outgoing.method, Method::GET);
        assert!(outgoing.body.is_empty());
        assert!(!outgoing.headers.contains("Content-Type"));
        assert_eq!(outgoing.uri, "http://example.com/done");
    }

    #[test]
    fn temporary_redirect_keeps_method_and_body() {
        let mut outgoing = outgoing("put", "http://example.com/a", Some("{}"), &[]);
        outgoing
            .redirect(StatusCode::TEMPORARY_REDIRECT, "http://example.com/b")
            .unwrap();

        assert_eq!(outgoing.method, Method::PUT);
        assert_eq!(outgoing.body, Bytes::from_static(b"{}"));
        assert!(outgoing.headers.contains("Content-Type"));
    }

    #[test]
    fn cross_host_redirect_drops_credentials() {
        let mut outgoing = outgoing(
            "get",
            "http://example.com/a",
            None,
            &["Authorization: Bearer t", "Cookie: s=1", "Accept: */*"],
        );
        outgoing
            .redirect(StatusCode::FOUND, "https://other.example.org/b")
            .unwrap();

        assert!(!outgoing.headers.contains("Authorization"));
        assert!(!outgoing.headers.contains("Cookie"));
        assert!(outgoing.headers.contains("Accept"));
    }

    #[test]
    fn redirect_limit_is_enforced() {
        let mut outgoing = outgoing("get", "http://example.com/0", None, &[]);
        for hop in 1..=MAX_REDIRECTS {
            outgoing
                .redirect(StatusCode::FOUND, &format!("/{}", hop))
                .unwrap();
        }

        let err = outgoing.redirect(StatusCode::FOUND, "/again").unwrap_err();
        assert!(matches!(err, TransportError::Redirect(_)));
        assert!(err.is_retryable());
    }

    #[test]
    fn only_standard_redirect_codes_are_followed() {
        for code in [301, 302, 303, 307, 308] {
            assert!(RedirectAdapter::is_followable(StatusCode::from_u16(code).unwrap()));
        }
        for code in [300, 304, 200, 404] {
            assert!(!RedirectAdapter::is_followable(StatusCode::from_u16(code).unwrap()));
        }
    }
}
