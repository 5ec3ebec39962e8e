//! Test request building.

use bytes::Bytes;
use http::{header, HeaderName, HeaderValue, Method, Uri};
use keryx_extract::{RequestContext, RequestContextBuilder};
use serde::Serialize;

use crate::error::TestError;
use crate::multipart::MultipartBody;

/// Entry points for building test requests.
///
/// # Example
///
/// ```
/// use keryx_test::TestRequest;
///
/// let request = TestRequest::get("/items/7")
///     .path_param("id", "7")
///     .query("page", "2")
///     .header("x-custom", "test-value")
///     .cookie("session_id", "abc")
///     .build()
///     .unwrap();
///
/// assert_eq!(request.path_params().get("id"), Some("7"));
/// assert_eq!(request.query().get("page"), Some("2"));
/// assert_eq!(request.cookies().get("session_id"), Some("abc"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TestRequest;

impl TestRequest {
    /// Creates a new GET request.
    pub fn get(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::GET, uri)
    }

    /// Creates a new POST request.
    pub fn post(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::POST, uri)
    }

    /// Creates a new PUT request.
    pub fn put(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::PUT, uri)
    }

    /// Creates a new PATCH request.
    pub fn patch(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::PATCH, uri)
    }

    /// Creates a new DELETE request.
    pub fn delete(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::DELETE, uri)
    }
}

/// Builder producing a [`RequestContext`] for binding tests.
#[must_use]
#[derive(Debug)]
pub struct TestRequestBuilder {
    inner: RequestContextBuilder,
    uri: String,
    query: Vec<(String, String)>,
    cookies: Vec<(String, String)>,
    error: Option<TestError>,
}

impl TestRequestBuilder {
    /// Creates a new request builder.
    pub fn new(method: Method, uri: impl AsRef<str>) -> Self {
        Self {
            inner: RequestContextBuilder::new().method(method),
            uri: uri.as_ref().to_string(),
            query: Vec::new(),
            cookies: Vec::new(),
            error: None,
        }
    }

    /// Appends a header to the request.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        let (name, value) = (name.as_ref(), value.as_ref());
        if HeaderName::try_from(name).is_err() || HeaderValue::try_from(value).is_err() {
            self.fail(TestError::InvalidHeader(format!("{name}: {value}")));
            return self;
        }
        self.inner = self.inner.header(name, value);
        self
    }

    /// Sets the Content-Type header.
    pub fn content_type(self, content_type: impl AsRef<str>) -> Self {
        self.header(header::CONTENT_TYPE.as_str(), content_type)
    }

    /// Adds a cookie; all cookies are sent in one `Cookie` header.
    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.push((name.into(), value.into()));
        self
    }

    /// Appends a percent-encoded query parameter to the URI.
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Adds a route match parameter.
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.inner = self.inner.path_param(name, value);
        self
    }

    /// Stores a request attribute.
    pub fn attr<T: Send + Sync + 'static>(mut self, name: impl Into<String>, value: T) -> Self {
        self.inner = self.inner.attr(name, value);
        self
    }

    /// Sets the raw request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.inner = self.inner.body(body);
        self
    }

    /// Sets the body as JSON and the Content-Type to `application/json`.
    pub fn json<T: Serialize>(mut self, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(bytes) => {
                self.inner = self.inner.body(bytes);
                self.content_type("application/json")
            }
            Err(e) => {
                self.fail(TestError::Json(e));
                self
            }
        }
    }

    /// Sets a `multipart/form-data` body and its Content-Type.
    pub fn multipart(mut self, body: &MultipartBody) -> Self {
        self.inner = self.inner.body(body.to_bytes());
        self.content_type(body.content_type())
    }

    /// Builds the request context.
    ///
    /// # Errors
    ///
    /// Returns the first error recorded while building, or
    /// `TestError::RequestBuild` for an invalid URI.
    pub fn build(self) -> Result<RequestContext, TestError> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let mut uri = self.uri;
        if !self.query.is_empty() {
            let encoded = self
                .query
                .iter()
                .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            uri.push(if uri.contains('?') { '&' } else { '?' });
            uri.push_str(&encoded);
        }

        let uri: Uri = uri
            .parse()
            .map_err(|e| TestError::RequestBuild(format!("Invalid URI: {e}")))?;

        let mut inner = self.inner.uri(uri);
        if !self.cookies.is_empty() {
            let cookie = self
                .cookies
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("; ");
            if HeaderValue::try_from(cookie.as_str()).is_err() {
                return Err(TestError::InvalidHeader(format!("cookie: {cookie}")));
            }
            inner = inner.header(header::COOKIE.as_str(), &cookie);
        }

        Ok(inner.build())
    }

    fn fail(&mut self, err: TestError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_request() {
        let request = TestRequest::get("/users").build().unwrap();
        assert_eq!(*request.method(), Method::GET);
        assert_eq!(request.path(), "/users");
    }

    #[test]
    fn test_verbs() {
        assert_eq!(*TestRequest::post("/").build().unwrap().method(), Method::POST);
        assert_eq!(*TestRequest::put("/").build().unwrap().method(), Method::PUT);
        assert_eq!(*TestRequest::patch("/").build().unwrap().method(), Method::PATCH);
        assert_eq!(*TestRequest::delete("/").build().unwrap().method(), Method::DELETE);
    }

    #[test]
    fn test_query_is_encoded() {
        let request = TestRequest::get("/search?lang=en")
            .query("q", "a b&c")
            .build()
            .unwrap();

        assert_eq!(request.query().get("lang"), Some("en"));
        assert_eq!(request.query().get("q"), Some("a b&c"));
    }

    #[test]
    fn test_cookies_joined() {
        let request = TestRequest::get("/")
            .cookie("a", "1")
            .cookie("b", "2")
            .build()
            .unwrap();

        assert_eq!(request.header("cookie").as_deref(), Some("a=1; b=2"));
        assert_eq!(request.cookies().get("b"), Some("2"));
    }

    #[test]
    fn test_json_body() {
        let request = TestRequest::post("/items")
            .json(&json!({"name": "widget"}))
            .build()
            .unwrap();

        assert_eq!(request.content_type(), Some("application/json"));
        assert_eq!(request.json().unwrap(), json!({"name": "widget"}));
    }

    #[test]
    fn test_invalid_header_reported() {
        let result = TestRequest::get("/").header("bad header", "v").build();
        assert!(matches!(result, Err(TestError::InvalidHeader(_))));
    }

    #[test]
    fn test_invalid_uri_reported() {
        let result = TestRequest::get("/path with space").build();
        assert!(matches!(result, Err(TestError::RequestBuild(_))));
    }

    #[test]
    fn test_attr() {
        let request = TestRequest::get("/").attr("user", 42_u32).build().unwrap();
        assert_eq!(request.attributes().get_as::<u32>("user"), Some(&42));
    }
}
