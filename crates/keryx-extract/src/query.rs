//! Query string parsing and extraction.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::extractor::{Extract, ExtractScope};
use crate::{BoundValue, ExtractionError, ExtractionSource};

/// Parsed query string arguments.
///
/// Repeated keys are not supported as multi-values: the first occurrence
/// wins.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    values: HashMap<String, String>,
}

impl QueryParams {
    /// Parses a raw query string (without the leading `?`).
    ///
    /// A query string that cannot be decoded yields no arguments.
    ///
    /// # Example
    ///
    /// ```rust
    /// use keryx_extract::QueryParams;
    ///
    /// let query = QueryParams::parse("a=5&b=hello%20world&a=6");
    /// assert_eq!(query.get("a"), Some("5"));
    /// assert_eq!(query.get("b"), Some("hello world"));
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let pairs: Vec<(String, String)> = match serde_urlencoded::from_str(raw) {
            Ok(pairs) => pairs,
            Err(e) => {
                tracing::debug!(error = %e, "ignoring undecodable query string");
                Vec::new()
            }
        };

        let mut values = HashMap::with_capacity(pairs.len());
        for (key, value) in pairs {
            values.entry(key).or_insert(value);
        }
        Self { values }
    }

    /// Returns the value for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Returns the number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if there are no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Resolves `Query` parameters, casting to the element type if declared.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryExtractor;

#[async_trait]
impl Extract for QueryExtractor {
    async fn extract(&self, scope: ExtractScope<'_>) -> Result<Option<BoundValue>, ExtractionError> {
        match scope.request.query().get(scope.key()) {
            Some(raw) => scope.convert(ExtractionSource::Query, raw).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ElementType, ExtractSettings, ExtractorKind, RequestContext};
    use http::Uri;
    use std::sync::Arc;

    fn request(uri: &'static str) -> Arc<RequestContext> {
        Arc::new(RequestContext::builder().uri(Uri::from_static(uri)).build())
    }

    #[test]
    fn test_parse_empty() {
        assert!(QueryParams::parse("").is_empty());
    }

    #[test]
    fn test_parse_plus_as_space() {
        let query = QueryParams::parse("q=rust+lang&flag=");
        assert_eq!(query.get("q"), Some("rust lang"));
        assert_eq!(query.get("flag"), Some(""));
        assert_eq!(query.len(), 2);
    }

    #[tokio::test]
    async fn test_query_cast() {
        let descriptor = ExtractorKind::Query.subscript(ElementType::Int).unwrap();
        let value = descriptor
            .extract("a", &request("/query?a=5"), &ExtractSettings::default())
            .await
            .unwrap();

        assert_eq!(value, Some(BoundValue::Int(5)));
    }

    #[tokio::test]
    async fn test_query_without_type_is_string() {
        let value = ExtractorKind::Query
            .descriptor()
            .extract("a", &request("/query?a=5"), &ExtractSettings::default())
            .await
            .unwrap();

        assert_eq!(value, Some(BoundValue::from("5")));
    }

    #[tokio::test]
    async fn test_query_invalid_type() {
        let descriptor = ExtractorKind::Query.subscript(ElementType::Int).unwrap();
        let err = descriptor
            .extract("a", &request("/query?a=five"), &ExtractSettings::default())
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Invalid type for query parameter 'a'. Expected int."
        );
    }

    #[tokio::test]
    async fn test_query_missing_is_absent_at_this_layer() {
        let descriptor = ExtractorKind::Query.subscript(("page", ElementType::Int)).unwrap();
        let value = descriptor
            .extract("p", &request("/query?p=1"), &ExtractSettings::default())
            .await
            .unwrap();

        assert_eq!(value, None);
    }
}
