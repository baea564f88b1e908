pub mod builders;
pub mod services;

pub use builders::{RequestBuilder, RequestInputs};
pub use services::{HttpClient, HttpRequestService, RequestRecorder, RequestValidator};
