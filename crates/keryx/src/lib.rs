//! # Keryx
//!
//! **Declarative request-parameter binding for async HTTP handlers**
//!
//! Handlers state where each parameter comes from, and Keryx pulls the
//! values out of the request before the handler runs:
//!
//! - **Declared once** – a [`Signature`](prelude::Signature) lists every
//!   parameter with its extractor and optional default
//! - **Validated at registration** – missing extractors, duplicate names and
//!   bad defaults fail before the first request
//! - **Cached plans** – each handler's plan is built once and reused
//! - **Uniform rejections** – missing or malformed values become `400` text
//!   responses and the handler is never called
//!
//! ## Quick Start
//!
//! ```rust
//! use keryx::prelude::*;
//! use serde_json::json;
//! use std::convert::Infallible;
//!
//! async fn add(args: Arguments) -> Result<Response, Infallible> {
//!     let a: i64 = args.get("a").unwrap();
//!     let b: i64 = args.get("b").unwrap();
//!     Ok(json_response(&json!({ "result": a + b })))
//! }
//!
//! # tokio_test::block_on(async {
//! let binder = Binder::new();
//! let add = binder
//!     .bind(
//!         Signature::new("add")
//!             .param("a", ExtractorKind::Query.subscript(ElementType::Int))
//!             .param_with_default("b", ExtractorKind::Query.subscript(ElementType::Int), 10),
//!         add,
//!     )
//!     .unwrap();
//!
//! let request = RequestContext::builder()
//!     .uri(http::Uri::from_static("/add?a=5"))
//!     .build();
//! let response = add.call::<Infallible>(request).await.unwrap();
//! assert_eq!(response.body().as_ref(), br#"{"result":15}"#);
//! # });
//! ```
//!
//! ## Architecture
//!
//! ```text
//! registration:  Signature → ResolutionPlan → PlanRegistry
//! request:       RequestContext → BindingEngine → Arguments → handler
//!                                      ↓
//!                              ExtractionError → 400 / 500
//! ```

#![doc(html_root_url = "https://docs.rs/keryx/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod setup;

pub use setup::{binder, init, InitError};

// Re-export extraction types
pub use keryx_extract as extract;

// Re-export binding types
pub use keryx_bind as bind;

// Re-export configuration types
pub use keryx_config as config;

// Re-export telemetry types
pub use keryx_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use keryx::prelude::*;
/// ```
pub mod prelude {
    pub use keryx_extract::{
        BoundValue, ConfigurationError, Descriptor, ElementType, ExtractionError,
        ExtractionErrorKind, ExtractorKind, File, RequestContext, Response,
    };

    // Re-export common response builders
    pub use keryx_extract::response::{json_response, JsonResponse, NoContent, TextResponse};

    pub use keryx_bind::{
        ArgumentError, Arguments, Binder, BoundHandler, BoundView, FromBound, Handler, Signature,
        View,
    };

    pub use keryx_config::{ConfigLoader, KeryxConfig};
}
