//! Per-kind extraction strategies.
//!
//! Every [`ExtractorKind`] is backed by one stateless strategy implementing
//! [`Extract`]. A strategy receives an [`ExtractScope`] naming the parameter,
//! its descriptor and the request, and answers with one of:
//!
//! - `Ok(Some(value))`: the request carries a value
//! - `Ok(None)`: the value is absent; the caller applies the default or the
//!   kind's absence policy
//! - `Err(error)`: a typed failure that must be reported to the client

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::attr::RequestAttrExtractor;
use crate::cookie::CookieExtractor;
use crate::header::HeaderExtractor;
use crate::json::JsonBodyExtractor;
use crate::multipart::{FileExtractor, MultipartConfig};
use crate::path::PathExtractor;
use crate::query::QueryExtractor;
use crate::{BoundValue, Descriptor, ExtractionError, ExtractionSource, ExtractorKind, RequestContext};

/// Settings shared by all extractors of an application.
#[derive(Debug, Clone)]
pub struct ExtractSettings {
    /// Convert `snake_case` parameter names to `Header-Case` for header lookups.
    pub normalize_header_names: bool,
    /// Limits applied when reading multipart bodies.
    pub multipart: MultipartConfig,
}

impl Default for ExtractSettings {
    fn default() -> Self {
        Self {
            normalize_header_names: true,
            multipart: MultipartConfig::default(),
        }
    }
}

/// Everything a strategy needs to resolve one parameter.
#[derive(Debug, Clone, Copy)]
pub struct ExtractScope<'a> {
    /// The handler parameter's own name.
    pub param: &'a str,
    /// The parameter's descriptor.
    pub descriptor: &'a Descriptor,
    /// The request being bound.
    pub request: &'a Arc<RequestContext>,
    /// Application-wide extraction settings.
    pub settings: &'a ExtractSettings,
}

impl<'a> ExtractScope<'a> {
    /// Returns the bound name if declared, otherwise the parameter name.
    #[must_use]
    pub fn key(&self) -> &'a str {
        self.descriptor.lookup_key(self.param)
    }

    /// Casts `raw` to the declared element type, if any.
    ///
    /// # Errors
    ///
    /// Returns a type-conversion error naming the lookup key.
    pub fn convert(&self, source: ExtractionSource, raw: &str) -> Result<BoundValue, ExtractionError> {
        match self.descriptor.element_type() {
            None => Ok(BoundValue::Str(raw.to_string())),
            Some(element) => element
                .cast(raw)
                .ok_or_else(|| ExtractionError::type_conversion(source, self.key(), element)),
        }
    }
}

/// A strategy that resolves one parameter from a request.
#[async_trait]
pub trait Extract: Send + Sync + fmt::Debug {
    /// Resolves the parameter described by `scope`.
    ///
    /// # Errors
    ///
    /// Returns an [`ExtractionError`] for values that are present but
    /// unusable, or when the request itself cannot be read.
    async fn extract(&self, scope: ExtractScope<'_>) -> Result<Option<BoundValue>, ExtractionError>;
}

/// Binds the request itself. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawRequestExtractor;

#[async_trait]
impl Extract for RawRequestExtractor {
    async fn extract(&self, scope: ExtractScope<'_>) -> Result<Option<BoundValue>, ExtractionError> {
        Ok(Some(BoundValue::Request(Arc::clone(scope.request))))
    }
}

static HEADER: HeaderExtractor = HeaderExtractor;
static COOKIE: CookieExtractor = CookieExtractor;
static PATH: PathExtractor = PathExtractor;
static QUERY: QueryExtractor = QueryExtractor;
static JSON_BODY: JsonBodyExtractor = JsonBodyExtractor;
static REQUEST_ATTR: RequestAttrExtractor = RequestAttrExtractor;
static FILE: FileExtractor = FileExtractor;
static RAW_REQUEST: RawRequestExtractor = RawRequestExtractor;

impl ExtractorKind {
    /// Returns the strategy backing this kind.
    #[must_use]
    pub fn strategy(&self) -> &'static dyn Extract {
        match self {
            Self::Header => &HEADER,
            Self::Cookie => &COOKIE,
            Self::Path => &PATH,
            Self::Query => &QUERY,
            Self::JsonBody => &JSON_BODY,
            Self::RequestAttr => &REQUEST_ATTR,
            Self::File => &FILE,
            Self::RawRequest => &RAW_REQUEST,
        }
    }
}

impl Descriptor {
    /// Runs this descriptor's strategy for `param` against `request`.
    ///
    /// Defaults are not applied here; see the binding engine.
    ///
    /// # Errors
    ///
    /// Propagates the strategy's [`ExtractionError`].
    pub async fn extract(
        &self,
        param: &str,
        request: &Arc<RequestContext>,
        settings: &ExtractSettings,
    ) -> Result<Option<BoundValue>, ExtractionError> {
        let scope = ExtractScope {
            param,
            descriptor: self,
            request,
            settings,
        };
        self.kind().strategy().extract(scope).await
    }
}
