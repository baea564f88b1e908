use clap::Parser;
use colored::Colorize;
use fetchr::error::error_chain;
use fetchr::infrastructure::config::Config;
use fetchr::infrastructure::logging::init_tracing;
use fetchr::presentation::cli::Cli;

/// fetchr: curl-like HTTP client
///
/// Sends one request with configurable timeout, redirect and retry
/// behaviour, then prints the status, headers and a pretty-printed JSON body.
#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env();
    if cli.no_color || !config.color_enabled {
        colored::control::set_override(false);
    }

    let result = match cli.request_service(&config) {
        Ok(request_service) => cli.run(&request_service).await,
        Err(err) => Err(err),
    };

    if let Err(err) = result {
        eprintln!("{}", error_chain(&*err).red());
        std::process::exit(1);
    }
}
