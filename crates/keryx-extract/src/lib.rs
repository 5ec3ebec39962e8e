//! # Keryx Extract
//!
//! Extractor kinds, parameter descriptors, and the per-kind strategies that
//! resolve one named value from an incoming request.
//!
//! ## Extractor kinds
//!
//! | Kind | Looks up | Converts | When absent |
//! |------|----------|----------|-------------|
//! | `Header` | headers, `x_custom` → `X-Custom` | no | null |
//! | `Cookie` | cookie jar | no | null |
//! | `Path` | route match parameters | to element type | null |
//! | `Query` | query string | to element type | `Missing query parameter '<name>'.` |
//! | `JsonBody` | whole body as JSON | no | `Request body is missing.` |
//! | `RequestAttr` | request attribute store | no | null |
//! | `File` | multipart parts | no | null |
//! | `RawRequest` | the request itself | no | never absent |
//!
//! ## Example
//!
//! ```rust
//! use keryx_extract::{BoundValue, ElementType, ExtractSettings, ExtractorKind, RequestContext};
//! use http::Uri;
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let request = Arc::new(
//!     RequestContext::builder()
//!         .uri(Uri::from_static("/items?page=2"))
//!         .build(),
//! );
//!
//! let page = ExtractorKind::Query.subscript(ElementType::Int).unwrap();
//! let value = page.extract("page", &request, &ExtractSettings::default()).await.unwrap();
//! assert_eq!(value, Some(BoundValue::Int(2)));
//! # });
//! ```
//!
//! ## Errors
//!
//! Extraction failures are [`ExtractionError`]s carrying the exact text of
//! the client response:
//!
//! ```rust
//! use keryx_extract::{ElementType, ExtractionError, ExtractionSource};
//!
//! let err = ExtractionError::type_conversion(ExtractionSource::Path, "b", ElementType::Int);
//! assert_eq!(err.status_code(), http::StatusCode::BAD_REQUEST);
//! assert_eq!(err.to_string(), "Invalid type for path parameter 'b'. Expected int.");
//! ```

#![doc(html_root_url = "https://docs.rs/keryx-extract/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod attr;
mod context;
mod cookie;
mod descriptor;
mod error;
mod extractor;
mod header;
mod json;
pub mod multipart;
mod params;
mod path;
mod query;
pub mod response;
mod value;

pub use attr::{Attributes, RequestAttrExtractor};
pub use context::{RequestContext, RequestContextBuilder};
pub use cookie::{CookieExtractor, Cookies};
pub use descriptor::{Descriptor, ElementType, ExtractorKind, Subscript, SubscriptItem};
pub use error::{ConfigurationError, ExtractionError, ExtractionErrorKind, ExtractionSource};
pub use extractor::{Extract, ExtractScope, ExtractSettings, RawRequestExtractor};
pub use header::{normalize_header_name, HeaderExtractor};
pub use json::JsonBodyExtractor;
pub use multipart::{File, FileExtractor, MultipartConfig};
pub use params::Params;
pub use path::PathExtractor;
pub use query::{QueryExtractor, QueryParams};
pub use response::Response;
pub use value::BoundValue;
