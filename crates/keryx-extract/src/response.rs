//! Response builders.
//!
//! Handlers return a plain [`Response`]; the binding layer passes it through
//! untouched. These builders cover the common cases.
//!
//! | Builder | Content-Type |
//! |---------|--------------|
//! | [`JsonResponse`] / [`json_response`] | `application/json` |
//! | [`TextResponse`] | `text/plain; charset=utf-8` |
//! | [`NoContent`] | none |
//!
//! ```rust
//! use keryx_extract::response::json_response;
//! use serde_json::json;
//!
//! let response = json_response(&json!({"result": 15}));
//! assert_eq!(response.status(), http::StatusCode::OK);
//! assert_eq!(response.body().as_ref(), br#"{"result":15}"#);
//! ```

use bytes::Bytes;
use http::{header, HeaderValue, Method, StatusCode};
use serde::Serialize;

/// The response type handlers produce.
pub type Response = http::Response<Bytes>;

/// Serializes `data` into a 200 OK JSON response.
#[must_use]
pub fn json_response<T: Serialize + ?Sized>(data: &T) -> Response {
    JsonResponse::new(data).into_response()
}

/// JSON response builder.
///
/// # Example
///
/// ```rust
/// use keryx_extract::response::JsonResponse;
/// use http::StatusCode;
///
/// let data = vec![1, 2, 3];
/// let response = JsonResponse::new(&data).with_status(StatusCode::CREATED);
/// assert_eq!(response.status(), StatusCode::CREATED);
/// ```
#[derive(Debug)]
pub struct JsonResponse<T> {
    data: T,
    status: StatusCode,
}

impl<T: Serialize> JsonResponse<T> {
    /// Creates a new JSON response with status 200 OK.
    #[must_use]
    pub fn new(data: T) -> Self {
        Self {
            data,
            status: StatusCode::OK,
        }
    }

    /// Sets a custom status code.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Returns the status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Builds the HTTP response.
    ///
    /// Serialization failures produce a 500 response.
    #[must_use]
    pub fn into_response(self) -> Response {
        match serde_json::to_vec(&self.data) {
            Ok(body) => http::Response::builder()
                .status(self.status)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Bytes::from(body))
                .expect("Failed to build response"),
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize JSON response");
                TextResponse::new("Internal Server Error")
                    .with_status(StatusCode::INTERNAL_SERVER_ERROR)
                    .into_response()
            }
        }
    }
}

/// Plain text response builder.
#[derive(Debug, Clone)]
pub struct TextResponse {
    body: String,
    status: StatusCode,
}

impl TextResponse {
    /// Creates a new text response with status 200 OK.
    #[must_use]
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            status: StatusCode::OK,
        }
    }

    /// Sets a custom status code.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Returns the status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the body content.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Builds the HTTP response.
    #[must_use]
    pub fn into_response(self) -> Response {
        http::Response::builder()
            .status(self.status)
            .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(Bytes::from(self.body))
            .expect("Failed to build response")
    }
}

/// 204 No Content.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoContent;

impl NoContent {
    /// Builds the HTTP response.
    #[must_use]
    pub fn into_response(self) -> Response {
        http::Response::builder()
            .status(StatusCode::NO_CONTENT)
            .body(Bytes::new())
            .expect("Failed to build response")
    }
}

/// 405 Method Not Allowed with an `Allow` header listing `allowed`.
#[must_use]
pub fn method_not_allowed(allowed: &[Method]) -> Response {
    let allow = allowed
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    let mut response = TextResponse::new("405: Method Not Allowed")
        .with_status(StatusCode::METHOD_NOT_ALLOWED)
        .into_response();
    if let Ok(value) = HeaderValue::from_str(&allow) {
        response.headers_mut().insert(header::ALLOW, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_response() {
        let response = json_response(&json!({"x_custom": "test-value"}));

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["x_custom"], "test-value");
    }

    #[test]
    fn test_text_response() {
        let response = TextResponse::new("hello")
            .with_status(StatusCode::ACCEPTED)
            .into_response();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(response.body().as_ref(), b"hello");
    }

    #[test]
    fn test_no_content() {
        let response = NoContent.into_response();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(response.body().is_empty());
    }

    #[test]
    fn test_method_not_allowed() {
        let response = method_not_allowed(&[Method::GET, Method::POST]);

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers().get(header::ALLOW).unwrap(), "GET, POST");
    }
}
