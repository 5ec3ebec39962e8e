//! # Keryx Test
//!
//! Test utilities for Keryx bindings: build a [`RequestContext`] without a
//! server, hand it to a bound handler or view, and assert on the response.
//!
//! ## Example
//!
//! ```ignore
//! use keryx_test::{TestRequest, TestResponse};
//!
//! #[tokio::test]
//! async fn test_add() {
//!     let handler = Binder::new().bind(add_signature(), add).unwrap();
//!
//!     let request = TestRequest::get("/query").query("a", "5").build().unwrap();
//!     let response = TestResponse::from(handler.call::<Infallible>(request).await.unwrap());
//!
//!     response
//!         .assert_status(StatusCode::OK)
//!         .assert_json_field("result", &json!(15));
//! }
//! ```
//!
//! [`RequestContext`]: keryx_extract::RequestContext

#![doc(html_root_url = "https://docs.rs/keryx-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod multipart;
mod request;
mod response;

pub use error::TestError;
pub use multipart::{MultipartBody, DEFAULT_BOUNDARY};
pub use request::{TestRequest, TestRequestBuilder};
pub use response::TestResponse;
