use crate::domain::{Body, Headers, Method, Request, Url};
use crate::error::{FetchError, Result};
use std::path::PathBuf;

/// Raw, CLI-shaped request inputs.
#[derive(Debug, Clone, Default)]
pub struct RequestInputs {
    pub method: String,
    pub url: String,
    /// Literal body, or `@path` to load the body from a file.
    pub body: Option<String>,
    /// `Key: Value` strings.
    pub headers: Vec<String>,
}

pub struct RequestBuilder {
    method: Method,
    url: Url,
    headers: Headers,
    body: Body,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: Method::default(),
            url: Url::default(),
            headers: Headers::new(),
            body: Body::default(),
        }
    }

    /// Builds a request from raw inputs in one step.
    pub fn from_inputs(inputs: RequestInputs) -> Result<Request> {
        Ok(Self::new()
            .method(&inputs.method)
            .url(&inputs.url)
            .headers(&inputs.headers)
            .body(inputs.body.as_deref())?
            .build())
    }

    pub fn method(mut self, method: &str) -> Self {
        self.method = Method::new(method);
        self
    }

    pub fn url(mut self, raw_url: &str) -> Self {
        self.url = Url::new(raw_url);
        self
    }

    /// Adds `Key: Value` headers. Entries without a colon are skipped.
    pub fn headers(mut self, raw_headers: &[String]) -> Self {
        for raw in raw_headers {
            match raw.split_once(':') {
                Some((key, value)) => self.headers.append(key.trim(), value.trim()),
                None => tracing::debug!("Ignoring malformed header '{}'", raw),
            }
        }
        self
    }

    /// Sets the body. A leading `@` names a file whose contents become the body.
    pub fn body(mut self, raw: Option<&str>) -> Result<Self> {
        self.body = match raw {
            Some(data) => match data.strip_prefix('@') {
                Some(path) => Self::read_body_file(path)?,
                None => Body::from(data),
            },
            None => Body::default(),
        };
        Ok(self)
    }

    pub fn build(mut self) -> Request {
        if !self.body.is_empty() && !self.headers.contains("Content-Type") {
            self.headers.set("Content-Type", "application/json");
        }

        Request {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
        }
    }

    fn read_body_file(path: &str) -> Result<Body> {
        std::fs::read(path)
            .map(Body::new)
            .map_err(|source| FetchError::FileRead {
                path: PathBuf::from(path),
                source,
            })
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
