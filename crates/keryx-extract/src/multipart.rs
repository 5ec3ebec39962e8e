//! Multipart form data and file extraction.
//!
//! A `File` parameter is resolved by scanning the `multipart/form-data` body
//! part by part until a part with the wanted field name is found. The part is
//! read fully into memory and bound as a [`File`].
//!
//! ```rust,ignore
//! let mut multipart = Multipart::new(request.headers(), request.body().clone(), config)?;
//! while let Some(field) = multipart.next_field().await? {
//!     if field.name() == Some("upload") {
//!         let file = field.into_file().await?;
//!         println!("{:?}: {} bytes", file.filename(), file.len());
//!     }
//! }
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use http::{header, HeaderMap};
use std::io;
use thiserror::Error;

use crate::extractor::{Extract, ExtractScope};
use crate::{BoundValue, ExtractionError, ExtractionSource};

/// Default maximum total body size for multipart (50 MB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 50 * 1024 * 1024;

/// Default maximum size per field (10 MB).
pub const DEFAULT_MAX_FIELD_SIZE: usize = 10 * 1024 * 1024;

/// Default maximum number of parts read from one body.
pub const DEFAULT_MAX_FIELDS: usize = 100;

/// Limits applied while reading a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartConfig {
    /// Maximum total body size in bytes.
    pub max_body_size: usize,
    /// Maximum size per field in bytes.
    pub max_field_size: usize,
    /// Maximum number of fields allowed.
    pub max_fields: usize,
}

impl Default for MultipartConfig {
    fn default() -> Self {
        Self {
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            max_field_size: DEFAULT_MAX_FIELD_SIZE,
            max_fields: DEFAULT_MAX_FIELDS,
        }
    }
}

impl MultipartConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum body size.
    #[must_use]
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = size;
        self
    }

    /// Set the maximum field size.
    #[must_use]
    pub fn max_field_size(mut self, size: usize) -> Self {
        self.max_field_size = size;
        self
    }

    /// Set the maximum number of fields.
    #[must_use]
    pub fn max_fields(mut self, count: usize) -> Self {
        self.max_fields = count;
        self
    }
}

/// Errors raised while reading a multipart body.
#[derive(Error, Debug)]
pub enum MultipartError {
    /// The request has no Content-Type header.
    #[error("missing Content-Type header, expected multipart/form-data")]
    MissingContentType,

    /// The Content-Type is not multipart or has no boundary.
    #[error("invalid multipart Content-Type: {0}")]
    InvalidContentType(String),

    /// The body exceeds the configured limit.
    #[error("multipart body too large: max {max} bytes, got {actual} bytes")]
    BodyTooLarge {
        /// Configured limit.
        max: usize,
        /// Actual size.
        actual: usize,
    },

    /// A single part exceeds the configured limit.
    #[error("multipart field too large: max {max} bytes, got {actual} bytes")]
    FieldTooLarge {
        /// Configured limit.
        max: usize,
        /// Actual size.
        actual: usize,
    },

    /// More parts than allowed.
    #[error("too many multipart fields (max {0})")]
    TooManyFields(usize),

    /// The stream itself is malformed.
    #[error(transparent)]
    Malformed(#[from] multer::Error),
}

/// Sequential reader over the parts of a multipart body.
pub struct Multipart {
    inner: multer::Multipart<'static>,
    config: MultipartConfig,
    field_count: usize,
}

impl Multipart {
    /// Creates a reader from request headers and body.
    ///
    /// # Errors
    ///
    /// Returns an error if the Content-Type header is missing, not multipart,
    /// has no boundary, or the body exceeds `config.max_body_size`.
    pub fn new(headers: &HeaderMap, body: Bytes, config: MultipartConfig) -> Result<Self, MultipartError> {
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .ok_or(MultipartError::MissingContentType)?
            .to_str()
            .map_err(|_| MultipartError::InvalidContentType("not valid UTF-8".to_string()))?;

        let boundary = multer::parse_boundary(content_type)
            .map_err(|e| MultipartError::InvalidContentType(e.to_string()))?;

        if body.len() > config.max_body_size {
            return Err(MultipartError::BodyTooLarge {
                max: config.max_body_size,
                actual: body.len(),
            });
        }

        let stream = futures_util::stream::once(async move { Ok::<_, io::Error>(body) });

        Ok(Self {
            inner: multer::Multipart::new(stream, boundary),
            config,
            field_count: 0,
        })
    }

    /// Returns the next part, or `None` after the last one.
    ///
    /// Unread earlier parts are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the field limit is exceeded or the stream is
    /// malformed.
    pub async fn next_field(&mut self) -> Result<Option<Field>, MultipartError> {
        if self.field_count >= self.config.max_fields {
            return Err(MultipartError::TooManyFields(self.config.max_fields));
        }

        match self.inner.next_field().await? {
            Some(field) => {
                self.field_count += 1;
                Ok(Some(Field {
                    inner: field,
                    max_size: self.config.max_field_size,
                }))
            }
            None => Ok(None),
        }
    }
}

impl std::fmt::Debug for Multipart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Multipart")
            .field("config", &self.config)
            .field("field_count", &self.field_count)
            .finish_non_exhaustive()
    }
}

/// One part of a multipart body.
pub struct Field {
    inner: multer::Field<'static>,
    max_size: usize,
}

impl Field {
    /// Returns the form field name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.inner.name()
    }

    /// Returns the client-supplied file name, if any.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.inner.file_name()
    }

    /// Returns the part headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    /// Reads the whole part.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or the part exceeds the field limit.
    pub async fn bytes(self) -> Result<Bytes, MultipartError> {
        let bytes = self.inner.bytes().await?;

        if bytes.len() > self.max_size {
            return Err(MultipartError::FieldTooLarge {
                max: self.max_size,
                actual: bytes.len(),
            });
        }

        Ok(bytes)
    }

    /// Reads the whole part into a [`File`].
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails.
    pub async fn into_file(self) -> Result<File, MultipartError> {
        let field_name = self.name().unwrap_or_default().to_string();
        let filename = self.file_name().map(String::from);
        let headers = self.headers().clone();
        let content = self.bytes().await?;

        Ok(File {
            field_name,
            filename,
            content,
            headers,
        })
    }
}

impl std::fmt::Debug for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.inner.name())
            .field("file_name", &self.inner.file_name())
            .field("max_size", &self.max_size)
            .finish_non_exhaustive()
    }
}

/// An uploaded file bound to a `File` parameter.
///
/// Owned by the request that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct File {
    field_name: String,
    filename: Option<String>,
    content: Bytes,
    headers: HeaderMap,
}

impl File {
    /// Creates a file value.
    #[must_use]
    pub fn new(
        field_name: impl Into<String>,
        filename: Option<String>,
        content: impl Into<Bytes>,
        headers: HeaderMap,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            filename,
            content: content.into(),
            headers,
        }
    }

    /// The form field name.
    #[must_use]
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// The original file name from the client.
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// The raw content.
    #[must_use]
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// The content decoded as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns the decoding error for non-UTF-8 content.
    pub fn text(&self) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.content)
    }

    /// The part headers (case-insensitive).
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The part's Content-Type.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }

    /// The content size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Returns true if the content is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// The file extension from the file name.
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        self.filename
            .as_deref()
            .and_then(|name| name.rsplit_once('.').map(|(_, ext)| ext))
    }
}

/// Resolves `File` parameters from a multipart body.
///
/// A request with neither a body nor a Content-Type binds null. Any other
/// problem reading the body is an extraction failure whose message is the
/// underlying error text.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileExtractor;

#[async_trait]
impl Extract for FileExtractor {
    async fn extract(&self, scope: ExtractScope<'_>) -> Result<Option<BoundValue>, ExtractionError> {
        let request = scope.request;
        if request.is_body_empty() && request.content_type().is_none() {
            return Ok(None);
        }

        let key = scope.key();
        let fail = |e: MultipartError| {
            tracing::error!(param = scope.param, field = key, error = %e, "failed to read multipart body");
            ExtractionError::extraction_failed(ExtractionSource::File, key, e)
        };

        let mut multipart = Multipart::new(
            request.headers(),
            request.body().clone(),
            scope.settings.multipart.clone(),
        )
        .map_err(fail)?;

        while let Some(field) = multipart.next_field().await.map_err(fail)? {
            if field.name() == Some(key) {
                let file = field.into_file().await.map_err(fail)?;
                return Ok(Some(BoundValue::File(file)));
            }
        }

        Ok(None)
    }
}
