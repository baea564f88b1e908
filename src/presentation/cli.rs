use crate::application::builders::{RequestBuilder, RequestInputs};
use crate::application::services::HttpRequestService;
use crate::domain::ExecutionPolicy;
use crate::domain::policy::DEFAULT_TIMEOUT;
use crate::infrastructure::config::Config;
use crate::infrastructure::history::FileHistory;
use crate::infrastructure::http_client::HyperHttpClient;
use crate::infrastructure::output::{RenderOptions, render_response};
use crate::presentation::banner::show_banner;
use crate::presentation::formatters::{curl_command, verbose_dump};
use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

/// CLI configuration for fetchr
#[derive(Parser, Debug)]
#[command(name = "fetchr", version)]
#[command(about = "fetchr: a small curl-like HTTP client with retries", long_about = None)]
pub struct Cli {
    /// Target URL
    pub url: String,

    /// HTTP method to use
    #[arg(short = 'X', long, default_value = "GET")]
    pub method: String,

    /// Custom header, "Key: Value" (can be used multiple times)
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,

    /// Request body, or @file to read it from a file
    #[arg(short = 'd', long = "data")]
    pub body: Option<String>,

    /// Save the response body to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Show raw output even if JSON
    #[arg(long)]
    pub raw: bool,

    /// Show only response status and headers
    #[arg(long)]
    pub headers_only: bool,

    /// Show only response body
    #[arg(long)]
    pub body_only: bool,

    /// Print full request details (method, headers, body)
    #[arg(short, long)]
    pub verbose: bool,

    /// Follow HTTP redirects
    #[arg(short = 'L', long, visible_alias = "follow-redirects")]
    pub follow: bool,

    /// Request timeout per attempt (e.g. 5s, 2m; 0s disables it)
    #[arg(long, default_value = DEFAULT_TIMEOUT)]
    pub timeout: String,

    /// Retry failed requests up to n times
    #[arg(long, default_value_t = 0)]
    pub retry: u32,

    /// Print the equivalent curl command
    #[arg(long)]
    pub export_curl: bool,

    /// Disable ASCII banner
    #[arg(long)]
    pub no_banner: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Do not append the request to the history file
    #[arg(long)]
    pub no_history: bool,
}

impl Cli {
    /// Raw request inputs, handed to the builder by value.
    pub fn request_inputs(&self) -> RequestInputs {
        RequestInputs {
            method: self.method.clone(),
            url: self.url.clone(),
            body: self.body.clone(),
            headers: self.headers.clone(),
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            raw_output: self.raw,
            headers_only: self.headers_only,
            body_only: self.body_only,
            out_file: self.output.clone(),
        }
    }

    /// Hyper-backed service, recording to the history file unless disabled.
    pub fn request_service(&self, config: &Config) -> Result<HttpRequestService> {
        let service = HyperHttpClient::new()?.create_request_service();
        if self.no_history || !config.history_enabled {
            return Ok(service);
        }
        Ok(service.with_recorder(Box::new(FileHistory::new(&config.history_path))))
    }

    pub async fn run(&self, request_service: &HttpRequestService) -> Result<()> {
        let started = Instant::now();

        if !self.no_banner {
            show_banner();
        }

        let options = self.render_options();
        options.validate()?;
        let policy = ExecutionPolicy::from_flags(&self.timeout, self.follow, self.retry)?;
        let request = RequestBuilder::from_inputs(self.request_inputs())?;

        if self.export_curl {
            println!("{}", "Equivalent curl command:".cyan());
            println!("{}", curl_command(&request));
        }

        if self.verbose {
            println!("{}", verbose_dump(&request).blue());
        }

        eprintln!(
            "{}",
            format!("Sending {} request to: {}", request.method, request.url).cyan()
        );

        let response = request_service.send_request(&request, &policy).await?;

        let mut stdout = std::io::stdout().lock();
        render_response(&response, &options, &mut stdout)?;
        stdout.flush()?;

        eprintln!(
            "{}",
            format!("Done in {:.2?}", started.elapsed()).bright_black()
        );

        Ok(())
    }
}
