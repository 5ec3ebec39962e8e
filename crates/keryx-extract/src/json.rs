//! JSON body extraction.

use async_trait::async_trait;

use crate::extractor::{Extract, ExtractScope};
use crate::{BoundValue, ExtractionError};

/// Resolves `JSONBody` parameters to the whole parsed body.
///
/// An empty or malformed body is reported as absent; the binding engine then
/// applies the default or rejects the request with `Request body is missing.`
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBodyExtractor;

#[async_trait]
impl Extract for JsonBodyExtractor {
    async fn extract(&self, scope: ExtractScope<'_>) -> Result<Option<BoundValue>, ExtractionError> {
        if scope.request.is_body_empty() {
            return Ok(None);
        }

        match scope.request.json() {
            Ok(value) => Ok(Some(BoundValue::Json(value))),
            Err(e) => {
                tracing::debug!(param = scope.param, error = %e, "request body is not valid JSON");
                Ok(None)
            }
        }
    }
}
