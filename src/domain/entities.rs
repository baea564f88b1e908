use crate::domain::headers::Headers;
use crate::domain::value_objects::{Body, Method, Url};
use hyper::body::Bytes;

/// Represents an HTTP request
///
/// Built once per invocation by the `RequestBuilder` and never modified after
/// it is handed to the executor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub headers: Headers,
    pub body: Body,
}

/// Represents an HTTP response
#[derive(Debug, Clone)]
pub struct Response {
    /// Status line such as `200 OK`.
    pub status: String,
    pub headers: Headers,
    pub body: Bytes,
}

impl Response {
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("Content-Type")
    }

    /// True when the Content-Type mentions `application/json` anywhere.
    pub fn is_json(&self) -> bool {
        self.content_type()
            .is_some_and(|value| value.contains("application/json"))
    }
}
