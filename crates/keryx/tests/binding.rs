//! End-to-end binding through bound function handlers.

use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use http::StatusCode;
use keryx::prelude::*;
use keryx_test::{MultipartBody, TestRequest, TestResponse};
use serde_json::json;

async fn add(args: Arguments) -> Result<Response, Infallible> {
    let a: i64 = args.get("a").unwrap();
    let b: i64 = args.get("b").unwrap();
    Ok(json_response(&json!({ "result": a + b })))
}

/// Echoes every argument that has a JSON form.
async fn echo(args: Arguments) -> Result<Response, Infallible> {
    let body: serde_json::Map<String, serde_json::Value> = args
        .iter()
        .map(|(name, _)| (name.to_string(), args.get::<serde_json::Value>(name).unwrap()))
        .collect();
    Ok(json_response(&body))
}

async fn call<H: Handler<Infallible>>(handler: &BoundHandler<H>, request: RequestContext) -> TestResponse {
    TestResponse::from(handler.call::<Infallible>(request).await.unwrap())
}

fn add_signature() -> Signature {
    Signature::new("add")
        .param("a", ExtractorKind::Query.subscript(ElementType::Int))
        .param_with_default("b", ExtractorKind::Query.subscript(ElementType::Int), 10)
}

#[tokio::test]
async fn test_query_with_default() {
    let handler = Binder::new().bind(add_signature(), add).unwrap();

    let request = TestRequest::get("/query").query("a", "5").build().unwrap();
    call(&handler, request)
        .await
        .assert_status(StatusCode::OK)
        .assert_json_eq(&json!({"result": 15}));
}

#[tokio::test]
async fn test_query_explicit_value_overrides_default() {
    let handler = Binder::new().bind(add_signature(), add).unwrap();

    let request = TestRequest::get("/query?a=5&b=1").build().unwrap();
    call(&handler, request).await.assert_json_eq(&json!({"result": 6}));
}

#[tokio::test]
async fn test_missing_query_rejected() {
    let handler = Binder::new().bind(add_signature(), add).unwrap();

    let request = TestRequest::get("/query").query("b", "10").build().unwrap();
    let response = call(&handler, request).await;
    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_text_eq("Missing query parameter 'a'.");
    assert_eq!(response.content_type(), Some("text/plain; charset=utf-8"));
}

#[tokio::test]
async fn test_query_conversion_failure() {
    let handler = Binder::new().bind(add_signature(), add).unwrap();

    let request = TestRequest::get("/query?a=five").build().unwrap();
    call(&handler, request)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_text_eq("Invalid type for query parameter 'a'. Expected int.");
}

#[tokio::test]
async fn test_header_name_normalized() {
    let handler = Binder::new()
        .bind(Signature::new("header").param("x_custom", ExtractorKind::Header), echo)
        .unwrap();

    let request = TestRequest::get("/header")
        .header("X-Custom", "test-value")
        .build()
        .unwrap();
    call(&handler, request)
        .await
        .assert_json_eq(&json!({"x_custom": "test-value"}));
}

#[tokio::test]
async fn test_header_explicit_name_and_absence() {
    let handler = Binder::new()
        .bind(
            Signature::new("header_named")
                .param("token", ExtractorKind::Header.subscript("Authorization"))
                .param("trace", ExtractorKind::Header),
            echo,
        )
        .unwrap();

    let request = TestRequest::get("/header")
        .header("Authorization", "Bearer abc")
        .build()
        .unwrap();
    call(&handler, request)
        .await
        .assert_status(StatusCode::OK)
        .assert_json_eq(&json!({"token": "Bearer abc", "trace": null}));
}

#[tokio::test]
async fn test_path_param_converted() {
    let handler = Binder::new()
        .bind(
            Signature::new("path")
                .param("a", ExtractorKind::Path)
                .param("b", ExtractorKind::Path.subscript(ElementType::Int)),
            echo,
        )
        .unwrap();

    let request = TestRequest::get("/path/x/7")
        .path_param("a", "x")
        .path_param("b", "7")
        .build()
        .unwrap();
    call(&handler, request)
        .await
        .assert_json_eq(&json!({"a": "x", "b": 7}));
}

#[tokio::test]
async fn test_path_param_conversion_failure() {
    let handler = Binder::new()
        .bind(
            Signature::new("path").param("b", ExtractorKind::Path.subscript(ElementType::Int)),
            echo,
        )
        .unwrap();

    let request = TestRequest::get("/path/abc").path_param("b", "abc").build().unwrap();
    call(&handler, request)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_text_eq("Invalid type for path parameter 'b'. Expected int.");
}

#[tokio::test]
async fn test_cookie_bound() {
    let handler = Binder::new()
        .bind(
            Signature::new("cookie")
                .param("session", ExtractorKind::Cookie)
                .param("theme", ExtractorKind::Cookie),
            echo,
        )
        .unwrap();

    let request = TestRequest::get("/cookie")
        .cookie("session", "abc123")
        .build()
        .unwrap();
    call(&handler, request)
        .await
        .assert_json_eq(&json!({"session": "abc123", "theme": null}));
}

#[tokio::test]
async fn test_json_body_bound() {
    let handler = Binder::new()
        .bind(Signature::new("json").param("body", ExtractorKind::JsonBody), echo)
        .unwrap();

    let request = TestRequest::post("/json")
        .json(&json!({"X-Custom": "test-value"}))
        .build()
        .unwrap();
    call(&handler, request)
        .await
        .assert_json_field("body.X-Custom", &json!("test-value"));
}

#[tokio::test]
async fn test_json_body_missing() {
    let handler = Binder::new()
        .bind(Signature::new("json").param("body", ExtractorKind::JsonBody), echo)
        .unwrap();

    let request = TestRequest::post("/json").build().unwrap();
    call(&handler, request)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_text_eq("Request body is missing.");
}

#[tokio::test]
async fn test_json_body_default_used_when_missing() {
    let handler = Binder::new()
        .bind(
            Signature::new("json_default").param_with_default(
                "body",
                ExtractorKind::JsonBody,
                BoundValue::Json(json!({"empty": true})),
            ),
            echo,
        )
        .unwrap();

    let request = TestRequest::post("/json").build().unwrap();
    call(&handler, request)
        .await
        .assert_json_eq(&json!({"body": {"empty": true}}));
}

#[tokio::test]
async fn test_file_upload() {
    let handler = Binder::new()
        .bind(
            Signature::new("upload").param("upload", ExtractorKind::File),
            |mut args: Arguments| async move {
                let file = args.take_file("upload").unwrap();
                Ok::<_, Infallible>(json_response(&json!({
                    "filename": file.filename(),
                    "content": file.text().unwrap(),
                })))
            },
        )
        .unwrap();

    let body = MultipartBody::new()
        .text("note", "ignored")
        .file("upload", "a.txt", "text/plain", "hello");
    let request = TestRequest::post("/upload").multipart(&body).build().unwrap();
    call(&handler, request)
        .await
        .assert_status(StatusCode::OK)
        .assert_json_eq(&json!({"filename": "a.txt", "content": "hello"}));
}

#[tokio::test]
async fn test_file_absent_is_null() {
    let handler = Binder::new()
        .bind(Signature::new("upload").param("upload", ExtractorKind::File), echo)
        .unwrap();

    let request = TestRequest::post("/upload").build().unwrap();
    call(&handler, request)
        .await
        .assert_json_eq(&json!({"upload": null}));
}

#[tokio::test]
async fn test_file_from_non_multipart_body_fails() {
    let handler = Binder::new()
        .bind(Signature::new("upload").param("upload", ExtractorKind::File), echo)
        .unwrap();

    let request = TestRequest::post("/upload")
        .json(&json!({"not": "multipart"}))
        .build()
        .unwrap();
    let response = call(&handler, request).await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!response.text().unwrap().is_empty());
}

#[tokio::test]
async fn test_raw_request_bound() {
    let handler = Binder::new()
        .bind(
            Signature::new("raw").param("request", ExtractorKind::RawRequest),
            |args: Arguments| async move {
                let request: Arc<RequestContext> = args.get("request").unwrap();
                Ok::<_, Infallible>(TextResponse::new(request.path()).into_response())
            },
        )
        .unwrap();

    let request = TestRequest::get("/raw/path").build().unwrap();
    call(&handler, request).await.assert_text_eq("/raw/path");
}

#[derive(Debug)]
struct CurrentUser {
    id: u64,
}

#[tokio::test]
async fn test_request_attr_bound() {
    let handler = Binder::new()
        .bind(
            Signature::new("attr")
                .param("user", ExtractorKind::RequestAttr)
                .param("tenant", ExtractorKind::RequestAttr),
            |args: Arguments| async move {
                let user = args.attr::<CurrentUser>("user").unwrap();
                let tenant: Option<String> = args.get("tenant").unwrap();
                Ok::<_, Infallible>(json_response(&json!({
                    "user": user.id,
                    "tenant": tenant,
                })))
            },
        )
        .unwrap();

    let request = TestRequest::get("/attr")
        .attr("user", CurrentUser { id: 42 })
        .build()
        .unwrap();
    call(&handler, request)
        .await
        .assert_json_eq(&json!({"user": 42, "tenant": null}));
}

#[tokio::test]
async fn test_first_failure_in_declaration_order_wins() {
    let handler = Binder::new()
        .bind(
            Signature::new("ordered")
                .param("id", ExtractorKind::Path.subscript(ElementType::Int))
                .param("page", ExtractorKind::Query.subscript(ElementType::Int)),
            echo,
        )
        .unwrap();

    let request = TestRequest::get("/items/x").path_param("id", "x").build().unwrap();
    call(&handler, request)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_text_eq("Invalid type for path parameter 'id'. Expected int.");
}

#[tokio::test]
async fn test_handler_invoked_exactly_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let handler = Binder::new()
        .bind(add_signature(), move |args: Arguments| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                add(args).await
            }
        })
        .unwrap();

    call(&handler, TestRequest::get("/query?a=1").build().unwrap()).await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    call(&handler, TestRequest::get("/query").build().unwrap())
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
