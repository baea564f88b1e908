pub mod config;
pub mod history;
pub mod http_client;
pub mod json;
pub mod logging;
pub mod output;
