//! Route match parameter extraction.

use async_trait::async_trait;

use crate::extractor::{Extract, ExtractScope};
use crate::{BoundValue, ExtractionError, ExtractionSource};

/// Resolves `Path` parameters, casting to the element type if declared.
///
/// A segment the router did not capture binds null; routers normally reject
/// such requests before a handler is chosen.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathExtractor;

#[async_trait]
impl Extract for PathExtractor {
    async fn extract(&self, scope: ExtractScope<'_>) -> Result<Option<BoundValue>, ExtractionError> {
        match scope.request.path_params().get(scope.key()) {
            Some(raw) => scope.convert(ExtractionSource::Path, raw).map(Some),
            None => Ok(None),
        }
    }
}
