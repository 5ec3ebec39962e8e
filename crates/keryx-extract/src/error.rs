//! Extraction error types.
//!
//! Two families of errors live here:
//!
//! - [`ExtractionError`] is produced while a request is being bound. It knows
//!   which HTTP status it maps to and carries the exact client-facing message.
//! - [`ConfigurationError`] is produced while a handler is being declared or
//!   registered. It never reaches a client.

use bytes::Bytes;
use http::{header, Response, StatusCode};
use std::fmt;
use thiserror::Error;

use crate::descriptor::ElementType;

/// Source of extraction (where data was being extracted from).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractionSource {
    /// HTTP headers
    Header,
    /// The `Cookie` header
    Cookie,
    /// Route match parameters (e.g., `/users/{id}`)
    Path,
    /// Query string parameters
    Query,
    /// Request body (JSON)
    Body,
    /// Request-scoped attribute store
    Attribute,
    /// Multipart file parts
    File,
}

impl fmt::Display for ExtractionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Header => write!(f, "header"),
            Self::Cookie => write!(f, "cookie"),
            Self::Path => write!(f, "path"),
            Self::Query => write!(f, "query"),
            Self::Body => write!(f, "body"),
            Self::Attribute => write!(f, "attribute"),
            Self::File => write!(f, "file"),
        }
    }
}

/// Error that occurs while binding a request to a handler's parameters.
///
/// The message is part of the observable contract: it is written verbatim
/// into the plain-text body of the error response.
///
/// # Example
///
/// ```rust
/// use keryx_extract::{ElementType, ExtractionError, ExtractionSource};
/// use http::StatusCode;
///
/// let err = ExtractionError::missing(ExtractionSource::Query, "page");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// assert_eq!(err.to_string(), "Missing query parameter 'page'.");
///
/// let err = ExtractionError::type_conversion(ExtractionSource::Path, "id", ElementType::Int);
/// assert_eq!(err.to_string(), "Invalid type for path parameter 'id'. Expected int.");
/// ```
#[derive(Debug, Clone)]
pub struct ExtractionError {
    extraction_source: ExtractionSource,
    kind: ExtractionErrorKind,
    field: Option<String>,
    message: String,
}

/// Classification of an [`ExtractionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractionErrorKind {
    /// A required value is absent and no default was declared.
    MissingRequired,
    /// A value was present but could not be converted to the element type.
    TypeConversionFailed,
    /// The extractor itself failed (e.g. a malformed multipart stream).
    ExtractionFailed,
}

impl ExtractionErrorKind {
    /// Short label used in logs and metrics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MissingRequired => "missing_required",
            Self::TypeConversionFailed => "type_conversion_failed",
            Self::ExtractionFailed => "extraction_failed",
        }
    }
}

impl ExtractionError {
    /// Creates an error for a missing required parameter.
    #[must_use]
    pub fn missing(source: ExtractionSource, field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            extraction_source: source,
            kind: ExtractionErrorKind::MissingRequired,
            message: format!("Missing {source} parameter '{field}'."),
            field: Some(field),
        }
    }

    /// Creates an error for a missing or unparseable request body.
    #[must_use]
    pub fn missing_body() -> Self {
        Self {
            extraction_source: ExtractionSource::Body,
            kind: ExtractionErrorKind::MissingRequired,
            message: "Request body is missing.".to_string(),
            field: None,
        }
    }

    /// Creates an error for a value that could not be cast to `expected`.
    #[must_use]
    pub fn type_conversion(
        source: ExtractionSource,
        field: impl Into<String>,
        expected: ElementType,
    ) -> Self {
        let field = field.into();
        Self {
            extraction_source: source,
            kind: ExtractionErrorKind::TypeConversionFailed,
            message: format!("Invalid type for {source} parameter '{field}'. Expected {expected}."),
            field: Some(field),
        }
    }

    /// Creates an error for an extractor-internal failure.
    ///
    /// The `cause` text becomes the response body unchanged.
    #[must_use]
    pub fn extraction_failed(
        source: ExtractionSource,
        field: impl Into<String>,
        cause: impl fmt::Display,
    ) -> Self {
        Self {
            extraction_source: source,
            kind: ExtractionErrorKind::ExtractionFailed,
            message: cause.to_string(),
            field: Some(field.into()),
        }
    }

    /// Returns the extraction source.
    #[must_use]
    pub fn extraction_source(&self) -> ExtractionSource {
        self.extraction_source
    }

    /// Returns the error classification.
    #[must_use]
    pub fn kind(&self) -> ExtractionErrorKind {
        self.kind
    }

    /// Returns the field name if applicable.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Returns the client-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the appropriate HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self.kind {
            ExtractionErrorKind::MissingRequired | ExtractionErrorKind::TypeConversionFailed => {
                StatusCode::BAD_REQUEST
            }
            ExtractionErrorKind::ExtractionFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code suitable for logs and metrics labels.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self.kind {
            ExtractionErrorKind::MissingRequired => "MISSING_PARAMETER",
            ExtractionErrorKind::TypeConversionFailed => "INVALID_PARAMETER",
            ExtractionErrorKind::ExtractionFailed => "EXTRACTION_FAILED",
        }
    }

    /// Builds the plain-text HTTP response for this error.
    #[must_use]
    pub fn into_response(self) -> Response<Bytes> {
        Response::builder()
            .status(self.status_code())
            .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(Bytes::from(self.message))
            .expect("Failed to build response")
    }
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExtractionError {}

/// Error raised when a handler's parameters are declared incorrectly.
///
/// These are registration-time failures; they are meant to stop the
/// application from starting rather than be handled.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A parameter was declared without an extractor kind.
    #[error("parameter '{param}' of handler '{handler}' has no extraction type")]
    MissingExtractor {
        /// Handler name.
        handler: String,
        /// Parameter name.
        param: String,
    },

    /// The same parameter name was declared twice.
    #[error("parameter '{param}' of handler '{handler}' is declared more than once")]
    DuplicateParameter {
        /// Handler name.
        handler: String,
        /// Parameter name.
        param: String,
    },

    /// A subscript was given in a form other than name, type, or (name, type).
    #[error("invalid subscript for {kind}: {reason}")]
    InvalidSubscript {
        /// Extractor kind the subscript was applied to.
        kind: String,
        /// What was wrong with it.
        reason: String,
    },

    /// An element type was declared on a kind that performs no conversion.
    #[error("{kind} does not convert values; element type '{element}' is not allowed")]
    UnsupportedElementType {
        /// Extractor kind.
        kind: String,
        /// The rejected element type.
        element: ElementType,
    },

    /// A default value does not match the declared element type.
    #[error("default for parameter '{param}' must be {expected}")]
    DefaultTypeMismatch {
        /// Parameter name.
        param: String,
        /// The declared element type.
        expected: ElementType,
    },

    /// A handler identity was registered again with different parameters.
    #[error("handler '{handler}' is already registered with a different signature")]
    ConflictingRegistration {
        /// Handler name.
        handler: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_query_message() {
        let err = ExtractionError::missing(ExtractionSource::Query, "a");

        assert_eq!(err.extraction_source(), ExtractionSource::Query);
        assert_eq!(err.kind(), ExtractionErrorKind::MissingRequired);
        assert_eq!(err.field(), Some("a"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "MISSING_PARAMETER");
        assert_eq!(err.to_string(), "Missing query parameter 'a'.");
    }

    #[test]
    fn test_missing_body_message() {
        let err = ExtractionError::missing_body();

        assert_eq!(err.extraction_source(), ExtractionSource::Body);
        assert_eq!(err.field(), None);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Request body is missing.");
    }

    #[test]
    fn test_type_conversion_message() {
        let err = ExtractionError::type_conversion(ExtractionSource::Query, "page", ElementType::Float);

        assert_eq!(err.kind(), ExtractionErrorKind::TypeConversionFailed);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "INVALID_PARAMETER");
        assert_eq!(
            err.to_string(),
            "Invalid type for query parameter 'page'. Expected float."
        );
    }

    #[test]
    fn test_extraction_failed_keeps_cause_text() {
        let err = ExtractionError::extraction_failed(
            ExtractionSource::File,
            "upload",
            "multipart stream ended unexpectedly",
        );

        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), "EXTRACTION_FAILED");
        assert_eq!(err.message(), "multipart stream ended unexpectedly");
    }

    #[test]
    fn test_into_response_is_plain_text() {
        let response = ExtractionError::missing(ExtractionSource::Query, "a").into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
        assert_eq!(response.body().as_ref(), b"Missing query parameter 'a'.");
    }

    #[test]
    fn test_configuration_error_display() {
        let err = ConfigurationError::MissingExtractor {
            handler: "get_no_type".to_string(),
            param: "a".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "parameter 'a' of handler 'get_no_type' has no extraction type"
        );
    }

    #[test]
    fn test_extraction_source_display() {
        assert_eq!(ExtractionSource::Path.to_string(), "path");
        assert_eq!(ExtractionSource::Query.to_string(), "query");
        assert_eq!(ExtractionSource::Body.to_string(), "body");
        assert_eq!(ExtractionSource::Header.to_string(), "header");
        assert_eq!(ExtractionSource::Cookie.to_string(), "cookie");
        assert_eq!(ExtractionSource::File.to_string(), "file");
    }
}
