use crate::domain::{ExecutionPolicy, Request, Response};
use crate::error::{FetchError, Result, TransportError};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

/// Fixed pause between a failed attempt and the next one.
pub const RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// Trait for HTTP clients to enable mocking and dependency inversion
///
/// One call is one attempt: the implementation applies the policy's timeout
/// and redirect settings but never retries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(
        &self,
        request: &Request,
        policy: &ExecutionPolicy,
    ) -> std::result::Result<Response, TransportError>;
}

/// Sink for the request history log
#[cfg_attr(test, mockall::automock)]
pub trait RequestRecorder: Send + Sync {
    fn record(&self, request: &Request) -> Result<()>;
}

/// Application service for orchestrating HTTP request workflows
///
/// Runs the retry loop around the transport: up to `retry_count + 1`
/// sequential attempts, a fixed backoff after each transport failure, and no
/// retries for responses of any status.
pub struct HttpRequestService {
    http_client: Box<dyn HttpClient>,
    recorder: Option<Box<dyn RequestRecorder>>,
    backoff: Duration,
}

impl HttpRequestService {
    pub fn new(http_client: Box<dyn HttpClient>) -> Self {
        Self {
            http_client,
            recorder: None,
            backoff: RETRY_BACKOFF,
        }
    }

    /// Records every attempt to the given history sink.
    pub fn with_recorder(mut self, recorder: Box<dyn RequestRecorder>) -> Self {
        self.recorder = Some(recorder);
        self
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Sends the request, retrying transport failures as the policy allows
    pub async fn send_request(
        &self,
        request: &Request,
        policy: &ExecutionPolicy,
    ) -> Result<Response> {
        self.validate_request(request)?;

        let max_attempts = policy.max_attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;
            self.record(request);
            debug!(
                attempt,
                max_attempts,
                method = %request.method,
                url = %request.url,
                "Sending request"
            );

            match self.http_client.send(request, policy).await {
                Ok(response) => {
                    debug!(attempt, status = %response.status, "Received response");
                    return Ok(response);
                }
                Err(TransportError::InvalidRequest(message)) => {
                    return Err(FetchError::RequestConstruction(message));
                }
                Err(error) => {
                    warn!("Attempt {} failed: {}", attempt, error);
                    if attempt >= max_attempts {
                        return Err(FetchError::Transport {
                            attempts: attempt,
                            source: error,
                        });
                    }
                    tokio::time::sleep(self.backoff).await;
                }
            }
        }
    }

    fn validate_request(&self, request: &Request) -> Result<()> {
        RequestValidator::validate(request)
    }

    fn record(&self, request: &Request) {
        if let Some(recorder) = &self.recorder {
            if let Err(err) = recorder.record(request) {
                warn!("{}", crate::error::error_chain(&err));
            }
        }
    }
}

/// Rejects requests the transport could never send, before any attempt
pub struct RequestValidator;

impl RequestValidator {
    pub fn validate(request: &Request) -> Result<()> {
        Self::validate_method(request)?;
        Self::validate_url(request)?;
        Self::validate_headers(request)?;
        Ok(())
    }

    fn validate_method(request: &Request) -> Result<()> {
        http::Method::from_bytes(request.method.as_str().as_bytes())
            .map(|_| ())
            .map_err(|_| {
                FetchError::RequestConstruction(format!(
                    "Invalid HTTP method: '{}'",
                    request.method
                ))
            })
    }

    fn validate_url(request: &Request) -> Result<()> {
        let url_str = request.url.as_str();

        if url_str.is_empty() {
            return Err(FetchError::RequestConstruction(
                "URL cannot be empty".to_string(),
            ));
        }

        let uri = url_str
            .parse::<http::Uri>()
            .map_err(|e| FetchError::RequestConstruction(format!("Invalid URL: {}", e)))?;

        match uri.scheme_str() {
            Some("http") | Some("https") if uri.host().is_some() => Ok(()),
            _ => Err(FetchError::RequestConstruction(
                "URL must start with http:// or https://".to_string(),
            )),
        }
    }

    fn validate_headers(request: &Request) -> Result<()> {
        for (name, values) in request.headers.iter() {
            http::HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
                FetchError::RequestConstruction(format!("Invalid header name: '{}'", name))
            })?;
            for value in values {
                http::HeaderValue::from_str(value).map_err(|_| {
                    FetchError::RequestConstruction(format!(
                        "Invalid value for header '{}': '{}'",
                        name, value
                    ))
                })?;
            }
        }
        Ok(())
    }
}
