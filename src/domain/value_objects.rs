use std::borrow::Cow;
use std::fmt;

/// Normalized HTTP method token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method(String);

impl Method {
    /// Creates a new Method, uppercasing the raw input
    ///
    /// The token is not checked here; the transport rejects values that are
    /// not valid HTTP methods before the first attempt.
    pub fn new(raw: &str) -> Self {
        Method(raw.trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_get(&self) -> bool {
        self.0 == "GET"
    }
}

impl Default for Method {
    fn default() -> Self {
        Method("GET".to_string())
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Target URL, kept exactly as the user typed it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Url(String);

impl Url {
    /// Creates a new Url
    ///
    /// # Arguments
    /// * `url` - The URL string
    ///
    /// Parsing is left to the transport, which reports malformed URLs as
    /// request construction failures.
    pub fn new(url: &str) -> Self {
        Url(url.to_string())
    }

    /// Returns the URL as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Request payload. An empty body means "no body".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Body(Vec<u8>);

impl Body {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Body(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when the body holds nothing but whitespace, Unicode spaces included.
    pub fn is_blank(&self) -> bool {
        self.as_text().trim().is_empty()
    }

    /// Body as text; invalid UTF-8 sequences are replaced.
    pub fn as_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body(text.as_bytes().to_vec())
    }
}
