use crate::domain::Response;
use crate::error::{FetchError, Result};
use crate::infrastructure::json;
use colored::Colorize;
use std::io::Write;
use std::path::PathBuf;

/// How a response is displayed.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Print JSON bodies as received instead of pretty-printing them.
    pub raw_output: bool,
    pub headers_only: bool,
    pub body_only: bool,
    /// Save the body to this path instead of printing it.
    pub out_file: Option<PathBuf>,
}

impl RenderOptions {
    pub fn validate(&self) -> Result<()> {
        if self.headers_only && self.body_only {
            return Err(FetchError::UsageConflict);
        }
        Ok(())
    }
}

/// Writes the status line, headers and body according to `options`.
///
/// Nothing is written when the options conflict.
pub fn render_response<W: Write>(
    response: &Response,
    options: &RenderOptions,
    out: &mut W,
) -> Result<()> {
    options.validate()?;

    if !options.body_only {
        print_status_and_headers(response, out)?;
    }

    if !options.headers_only {
        if !options.body_only {
            writeln!(out)?;
            writeln!(out, "{}", "Body:".bold())?;
        }
        print_response_body(response, options, out)?;
    }

    Ok(())
}

fn print_status_and_headers<W: Write>(response: &Response, out: &mut W) -> Result<()> {
    writeln!(out, "{}", format!("Status: {}", response.status).green())?;
    writeln!(out, "{}", "Headers:".yellow())?;
    for (name, values) in response.headers.iter() {
        writeln!(out, "   {}: {}", name, values.join(", "))?;
    }
    Ok(())
}

fn print_response_body<W: Write>(
    response: &Response,
    options: &RenderOptions,
    out: &mut W,
) -> Result<()> {
    if let Some(path) = &options.out_file {
        std::fs::write(path, &response.body).map_err(|source| FetchError::OutputWrite {
            path: path.clone(),
            source,
        })?;
        writeln!(out, "{}", format!("Response saved to {}", path.display()).blue())?;
        return Ok(());
    }

    if response.is_json() && !options.raw_output {
        if let Some(pretty) = json::pretty_print(&response.body) {
            write!(out, "{}", pretty)?;
            return Ok(());
        }
        tracing::debug!("Response claims JSON but does not parse; printing raw body");
    }

    out.write_all(&response.body)?;
    writeln!(out)?;
    Ok(())
}
