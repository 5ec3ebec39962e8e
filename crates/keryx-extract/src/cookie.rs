//! Cookie jar parsing and extraction.

use async_trait::async_trait;
use http::{header, HeaderMap};
use std::collections::HashMap;

use crate::extractor::{Extract, ExtractScope};
use crate::{BoundValue, ExtractionError};

/// Cookies sent with a request.
///
/// Parsed from every `Cookie` header. When a name repeats, the first
/// occurrence wins.
///
/// # Example
///
/// ```rust
/// use keryx_extract::Cookies;
/// use http::{HeaderMap, HeaderValue};
///
/// let mut headers = HeaderMap::new();
/// headers.insert(
///     http::header::COOKIE,
///     HeaderValue::from_static("session=abc123; theme=dark"),
/// );
///
/// let cookies = Cookies::from_headers(&headers);
/// assert_eq!(cookies.get("session"), Some("abc123"));
/// assert_eq!(cookies.get("theme"), Some("dark"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Cookies {
    cookies: HashMap<String, String>,
}

impl Cookies {
    /// Create an empty cookie jar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses all `Cookie` headers. Non-UTF-8 headers are skipped.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut jar = Self::new();
        for value in headers.get_all(header::COOKIE) {
            if let Ok(value) = value.to_str() {
                jar.parse_into(value);
            }
        }
        jar
    }

    fn parse_into(&mut self, header_value: &str) {
        for cookie in header_value.split(';') {
            if let Some((name, value)) = cookie.trim().split_once('=') {
                let name = name.trim();
                if name.is_empty() {
                    continue;
                }
                // Remove surrounding quotes if present
                let value = value.trim().trim_matches('"');
                self.cookies
                    .entry(name.to_string())
                    .or_insert_with(|| value.to_string());
            }
        }
    }

    /// Get a cookie value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Check if a cookie exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.cookies.contains_key(name)
    }

    /// Get the number of cookies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    /// Check if there are no cookies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

/// Resolves `Cookie` parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct CookieExtractor;

#[async_trait]
impl Extract for CookieExtractor {
    async fn extract(&self, scope: ExtractScope<'_>) -> Result<Option<BoundValue>, ExtractionError> {
        Ok(scope
            .request
            .cookies()
            .get(scope.key())
            .map(BoundValue::from))
    }
}
