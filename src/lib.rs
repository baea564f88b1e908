//! fetchr: a curl-like HTTP client.
//!
//! Raw flag values become a [`domain::Request`] through the
//! [`application::RequestBuilder`], the [`application::HttpRequestService`]
//! sends it with timeout, redirect and retry control over a hyper transport,
//! and [`infrastructure::output`] renders the [`domain::Response`].

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

pub use error::{FetchError, Result, TransportError};
