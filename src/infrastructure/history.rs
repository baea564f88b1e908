use crate::application::services::RequestRecorder;
use crate::domain::Request;
use crate::error::{FetchError, Result};
use chrono::{Local, NaiveDateTime};
use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only request history file.
///
/// The file is opened, written and closed for every entry. Concurrent
/// invocations rely on the platform's append-mode atomicity, which not every
/// filesystem guarantees for large entries.
pub struct FileHistory {
    path: PathBuf,
}

impl FileHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Formats one history block.
    pub fn format_entry(request: &Request, timestamp: NaiveDateTime) -> String {
        let mut entry = String::new();
        let _ = writeln!(
            entry,
            "[{}] {} {}",
            timestamp.format("%Y-%m-%d %H:%M:%S"),
            request.method,
            request.url
        );

        if !request.headers.is_empty() {
            entry.push_str("Headers:\n");
            for (name, values) in request.headers.iter() {
                let _ = writeln!(entry, "  {}: {}", name, values.join(", "));
            }
        }

        if !request.body.is_blank() {
            let _ = writeln!(entry, "Body:\n  {}", request.body.as_text());
        }

        entry.push_str("---\n\n");
        entry
    }

    fn append(&self, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(entry.as_bytes())
    }
}

impl RequestRecorder for FileHistory {
    fn record(&self, request: &Request) -> Result<()> {
        let entry = Self::format_entry(request, Local::now().naive_local());
        self.append(&entry).map_err(|source| FetchError::LogWrite {
            path: self.path.clone(),
            source,
        })
    }
}
