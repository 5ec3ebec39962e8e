//! Header extraction.
//!
//! Header parameters are usually declared with Rust-style names
//! (`x_custom`, `user_agent`). Unless a bound name is given, the parameter
//! name is converted to the conventional header spelling before lookup:
//!
//! | Parameter | Header looked up |
//! |-----------|------------------|
//! | `x_custom` | `X-Custom` |
//! | `user_agent` | `User-Agent` |
//! | `a` | `A` |
//!
//! The lookup itself is case-insensitive.

use async_trait::async_trait;

use crate::extractor::{Extract, ExtractScope};
use crate::{BoundValue, ExtractionError};

/// Converts a `snake_case` parameter name to `Header-Case`.
///
/// Single-character names are capitalized; longer names are split on `_`,
/// each word is capitalized (first letter upper, rest lower) and the words
/// are joined with `-`.
///
/// # Example
///
/// ```rust
/// use keryx_extract::normalize_header_name;
///
/// assert_eq!(normalize_header_name("x_custom"), "X-Custom");
/// assert_eq!(normalize_header_name("CONTENT_TYPE"), "Content-Type");
/// assert_eq!(normalize_header_name("a"), "A");
/// ```
#[must_use]
pub fn normalize_header_name(name: &str) -> String {
    if name.chars().count() == 1 {
        return capitalize(name);
    }

    name.split('_').map(capitalize).collect::<Vec<_>>().join("-")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Resolves `Header` parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderExtractor;

#[async_trait]
impl Extract for HeaderExtractor {
    async fn extract(&self, scope: ExtractScope<'_>) -> Result<Option<BoundValue>, ExtractionError> {
        let name = match scope.descriptor.bound_name() {
            Some(bound) => bound.to_string(),
            None if scope.settings.normalize_header_names => normalize_header_name(scope.param),
            None => scope.param.to_string(),
        };

        Ok(scope.request.header(&name).map(BoundValue::Str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExtractSettings, ExtractorKind, RequestContext};
    use proptest::prelude::*;
    use std::sync::Arc;

    async fn extract_header(
        descriptor: crate::Descriptor,
        param: &str,
        request: RequestContext,
        settings: &ExtractSettings,
    ) -> Option<BoundValue> {
        descriptor
            .extract(param, &Arc::new(request), settings)
            .await
            .unwrap()
    }

    #[test]
    fn test_normalize_header_name() {
        assert_eq!(normalize_header_name("x_custom"), "X-Custom");
        assert_eq!(normalize_header_name("user_agent"), "User-Agent");
        assert_eq!(normalize_header_name("authorization"), "Authorization");
        assert_eq!(normalize_header_name("x"), "X");
        assert_eq!(normalize_header_name("x__y"), "X--Y");
    }

    #[tokio::test]
    async fn test_snake_case_param_matches_header() {
        let request = RequestContext::builder()
            .header("X-Custom", "test-value")
            .build();

        let value = extract_header(
            ExtractorKind::Header.descriptor(),
            "x_custom",
            request,
            &ExtractSettings::default(),
        )
        .await;

        assert_eq!(value, Some(BoundValue::from("test-value")));
    }

    #[tokio::test]
    async fn test_bound_name_is_used_verbatim() {
        let request = RequestContext::builder()
            .header("x-request-id", "abc-123")
            .build();

        let value = extract_header(
            ExtractorKind::Header.subscript("X-Request-Id").unwrap(),
            "request_id",
            request,
            &ExtractSettings::default(),
        )
        .await;

        assert_eq!(value, Some(BoundValue::from("abc-123")));
    }

    #[tokio::test]
    async fn test_missing_header_is_absent() {
        let value = extract_header(
            ExtractorKind::Header.descriptor(),
            "x_custom",
            RequestContext::builder().build(),
            &ExtractSettings::default(),
        )
        .await;

        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_normalization_can_be_disabled() {
        let settings = ExtractSettings {
            normalize_header_names: false,
            ..ExtractSettings::default()
        };
        let request = RequestContext::builder()
            .header("X-Custom", "test-value")
            .build();

        let value = extract_header(ExtractorKind::Header.descriptor(), "x_custom", request, &settings).await;
        assert_eq!(value, None);
    }

    proptest! {
        #[test]
        fn prop_normalized_names_have_no_underscores(words in prop::collection::vec("[a-z]{1,8}", 2..5)) {
            let name = words.join("_");
            let normalized = normalize_header_name(&name);

            prop_assert!(!normalized.contains('_'));
            prop_assert_eq!(normalized.split('-').count(), words.len());
            prop_assert_eq!(normalized.to_lowercase(), words.join("-"));
        }

        #[test]
        fn prop_normalization_is_idempotent(words in prop::collection::vec("[a-z]{1,8}", 1..5)) {
            let once = normalize_header_name(&words.join("_"));
            let twice = normalize_header_name(&once.replace('-', "_"));

            prop_assert_eq!(once, twice);
        }
    }
}
