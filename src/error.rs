//! Error types shared by every layer.

use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type for fetchr operations.
pub type Result<T> = std::result::Result<T, FetchError>;

/// Errors that end the processing of a request.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The timeout flag could not be parsed as a duration.
    #[error("Invalid timeout duration '{input}': {reason}")]
    InvalidTimeoutFormat {
        /// Raw value supplied by the user.
        input: String,
        /// Parser message.
        reason: String,
    },

    /// A `@file` body could not be read.
    #[error("Failed to read file {}: {source}", path.display())]
    FileRead {
        /// File named after the `@`.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The request could not be turned into something the transport can send.
    #[error("Request creation failed: {0}")]
    RequestConstruction(String),

    /// Every allowed attempt failed at the transport level.
    #[error("Request failed after {attempts} attempt(s): {source}")]
    Transport {
        /// Number of attempts made.
        attempts: u32,
        /// Error from the final attempt.
        #[source]
        source: TransportError,
    },

    /// `--headers-only` and `--body-only` were both requested.
    #[error("You cannot use --headers-only and --body-only together.")]
    UsageConflict,

    /// The request history file could not be written.
    #[error("Failed to log request to {}: {source}", path.display())]
    LogWrite {
        /// History file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The response body could not be saved to the output file.
    #[error("Failed to write response to {}: {source}", path.display())]
    OutputWrite {
        /// Output file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Writing to the terminal failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Failure of a single transport attempt.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The attempt did not finish before its deadline.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Could not connect (DNS, refused, TLS handshake).
    #[error("connection error: {0}")]
    Connection(String),

    /// The exchange failed after connecting.
    #[error("request error: {0}")]
    Request(String),

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),

    /// A redirect could not be followed.
    #[error("redirect error: {0}")]
    Redirect(String),

    /// The request itself is malformed; sending it again cannot help.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl TransportError {
    /// Check if another attempt may succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::InvalidRequest(_))
    }

    /// Check if this is a timeout error.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

/// Renders an error together with its `source()` chain.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
