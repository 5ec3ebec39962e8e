//! Class-style views.
//!
//! A view groups verb methods (`get`, `post`, `put`, `patch`, `delete`) on one
//! type. Each method is planned and bound individually; on dispatch the view
//! is constructed from the request and passed to the method together with
//! its resolved arguments.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use http::Method;
use indexmap::IndexMap;
use keryx_extract::response::method_not_allowed;
use keryx_extract::{ConfigurationError, RequestContext, Response};

use crate::arguments::Arguments;
use crate::engine::BindingEngine;
use crate::handler::Binder;
use crate::plan::ResolutionPlan;
use crate::registry::HandlerId;
use crate::signature::Signature;

/// A type whose verb methods are bound as request handlers.
///
/// # Example
///
/// ```rust
/// use keryx_bind::{Arguments, Binder, View};
/// use keryx_extract::response::TextResponse;
/// use keryx_extract::{ExtractorKind, RequestContext, Response};
/// use std::convert::Infallible;
/// use std::sync::Arc;
///
/// struct Items {
///     path: String,
/// }
///
/// impl View for Items {
///     fn from_request(request: &Arc<RequestContext>) -> Self {
///         Self { path: request.path().to_string() }
///     }
/// }
///
/// let view = Binder::new()
///     .view::<Items, Infallible>()
///     .get(keryx_bind::Signature::new("Items.get"), |view: Items, _args: Arguments| async move {
///         Ok(TextResponse::new(view.path).into_response())
///     })
///     .bind()
///     .unwrap();
///
/// assert_eq!(view.allowed_methods(), vec![http::Method::GET]);
/// ```
pub trait View: Send + Sized + 'static {
    /// Constructs the view for one request.
    fn from_request(request: &Arc<RequestContext>) -> Self;
}

type ViewMethod<V, E> =
    Arc<dyn Fn(V, Arguments) -> BoxFuture<'static, Result<Response, E>> + Send + Sync>;

struct PendingMethod<V, E> {
    verb: Method,
    signature: Signature,
    method: ViewMethod<V, E>,
}

/// Collects the verb methods of view `V` before binding them.
pub struct ViewBinder<V, E> {
    binder: Binder,
    pending: Vec<PendingMethod<V, E>>,
}

impl<V: View, E: Send + 'static> ViewBinder<V, E> {
    pub(crate) fn new(binder: Binder) -> Self {
        Self {
            binder,
            pending: Vec::new(),
        }
    }

    /// Registers the `GET` method.
    #[must_use]
    pub fn get<F, Fut>(self, signature: Signature, method: F) -> Self
    where
        F: Fn(V, Arguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response, E>> + Send + 'static,
    {
        self.method(Method::GET, signature, method)
    }

    /// Registers the `POST` method.
    #[must_use]
    pub fn post<F, Fut>(self, signature: Signature, method: F) -> Self
    where
        F: Fn(V, Arguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response, E>> + Send + 'static,
    {
        self.method(Method::POST, signature, method)
    }

    /// Registers the `PUT` method.
    #[must_use]
    pub fn put<F, Fut>(self, signature: Signature, method: F) -> Self
    where
        F: Fn(V, Arguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response, E>> + Send + 'static,
    {
        self.method(Method::PUT, signature, method)
    }

    /// Registers the `PATCH` method.
    #[must_use]
    pub fn patch<F, Fut>(self, signature: Signature, method: F) -> Self
    where
        F: Fn(V, Arguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response, E>> + Send + 'static,
    {
        self.method(Method::PATCH, signature, method)
    }

    /// Registers the `DELETE` method.
    #[must_use]
    pub fn delete<F, Fut>(self, signature: Signature, method: F) -> Self
    where
        F: Fn(V, Arguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response, E>> + Send + 'static,
    {
        self.method(Method::DELETE, signature, method)
    }

    fn method<F, Fut>(mut self, verb: Method, signature: Signature, method: F) -> Self
    where
        F: Fn(V, Arguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response, E>> + Send + 'static,
    {
        let method: ViewMethod<V, E> =
            Arc::new(move |view: V, args: Arguments| method(view, args).boxed());
        self.pending.retain(|p| p.verb != verb);
        self.pending.push(PendingMethod {
            verb,
            signature,
            method,
        });
        self
    }

    /// Plans every registered method and returns the dispatchable view.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigurationError`] raised by a method's
    /// signature.
    pub fn bind(self) -> Result<BoundView<V, E>, ConfigurationError> {
        let mut routes = IndexMap::with_capacity(self.pending.len());

        for pending in self.pending {
            let id = HandlerId::of::<V>(format!(
                "{}:{}",
                pending.signature.name(),
                pending.verb.as_str().to_ascii_lowercase()
            ));
            let plan = self.binder.registry().plan_for(id, &pending.signature)?;
            routes.insert(
                pending.verb,
                Route {
                    plan,
                    method: pending.method,
                },
            );
        }

        tracing::debug!(
            view = std::any::type_name::<V>(),
            methods = routes.len(),
            "view bound"
        );
        Ok(BoundView {
            routes,
            engine: Arc::clone(self.binder.engine()),
        })
    }
}

impl<V, E> fmt::Debug for ViewBinder<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewBinder")
            .field("view", &std::any::type_name::<V>())
            .field(
                "methods",
                &self.pending.iter().map(|p| &p.verb).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

struct Route<V, E> {
    plan: Arc<ResolutionPlan>,
    method: ViewMethod<V, E>,
}

/// A view with every verb method bound.
pub struct BoundView<V, E> {
    routes: IndexMap<Method, Route<V, E>>,
    engine: Arc<BindingEngine>,
}

impl<V: View, E> BoundView<V, E> {
    /// Returns the verbs this view answers, in registration order.
    #[must_use]
    pub fn allowed_methods(&self) -> Vec<Method> {
        self.routes.keys().cloned().collect()
    }

    /// Returns the plan bound to `verb`.
    #[must_use]
    pub fn plan(&self, verb: &Method) -> Option<&Arc<ResolutionPlan>> {
        self.routes.get(verb).map(|route| &route.plan)
    }

    /// Routes `request` to the method for its verb.
    ///
    /// Verbs without a method are answered with `405 Method Not Allowed`.
    /// Binding failures are answered with their error response.
    ///
    /// # Errors
    ///
    /// Only errors produced by the view method itself.
    pub async fn dispatch(&self, request: impl Into<Arc<RequestContext>>) -> Result<Response, E> {
        let request = request.into();

        let Some(route) = self.routes.get(request.method()) else {
            tracing::debug!(
                view = std::any::type_name::<V>(),
                method = %request.method(),
                "no view method for verb"
            );
            return Ok(method_not_allowed(&self.allowed_methods()));
        };

        match self.engine.resolve(&route.plan, &request).await {
            Ok(args) => {
                let view = V::from_request(&request);
                (route.method)(view, args).await
            }
            Err(err) => Ok(err.into_response()),
        }
    }
}

impl<V, E> fmt::Debug for BoundView<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundView")
            .field("view", &std::any::type_name::<V>())
            .field("methods", &self.routes.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{header, StatusCode, Uri};
    use keryx_extract::response::json_response;
    use keryx_extract::{ElementType, ExtractorKind};
    use serde_json::json;
    use std::convert::Infallible;

    struct ItemView {
        prefix: String,
    }

    impl View for ItemView {
        fn from_request(request: &Arc<RequestContext>) -> Self {
            Self {
                prefix: request.path().to_string(),
            }
        }
    }

    fn bound() -> BoundView<ItemView, Infallible> {
        Binder::new()
            .view::<ItemView, Infallible>()
            .get(
                Signature::new("ItemView.get")
                    .param("id", ExtractorKind::Path.subscript(ElementType::Int)),
                |view: ItemView, args: Arguments| async move {
                    let id: Option<i64> = args.get("id").unwrap();
                    Ok(json_response(&json!({ "path": view.prefix, "id": id })))
                },
            )
            .post(
                Signature::new("ItemView.post").param("body", ExtractorKind::JsonBody),
                |_view: ItemView, args: Arguments| async move {
                    let body: serde_json::Value = args.get("body").unwrap();
                    Ok(json_response(&body))
                },
            )
            .bind()
            .unwrap()
    }

    #[tokio::test]
    async fn test_dispatch_get() {
        let request = RequestContext::builder()
            .uri(Uri::from_static("/items/7"))
            .path_param("id", "7")
            .build();

        let response = bound().dispatch(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body, json!({ "path": "/items/7", "id": 7 }));
    }

    #[tokio::test]
    async fn test_dispatch_binding_failure() {
        let request = RequestContext::builder()
            .method(Method::POST)
            .uri(Uri::from_static("/items"))
            .build();

        let response = bound().dispatch(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.body().as_ref(), b"Request body is missing.");
    }

    #[tokio::test]
    async fn test_unregistered_verb_is_405() {
        let request = RequestContext::builder()
            .method(Method::DELETE)
            .uri(Uri::from_static("/items/7"))
            .build();

        let response = bound().dispatch(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers().get(header::ALLOW).unwrap(), "GET, POST");
    }

    #[test]
    fn test_each_verb_has_its_own_plan() {
        let binder = Binder::new();
        let view = binder
            .view::<ItemView, Infallible>()
            .get(Signature::new("ItemView.get"), |_v: ItemView, _a: Arguments| async {
                Ok(json_response(&json!(null)))
            })
            .delete(Signature::new("ItemView.delete"), |_v: ItemView, _a: Arguments| async {
                Ok(json_response(&json!(null)))
            })
            .bind()
            .unwrap();

        assert_eq!(binder.registry().len(), 2);
        assert!(view.plan(&Method::GET).is_some());
        assert!(view.plan(&Method::PUT).is_none());
    }

    #[test]
    fn test_untyped_method_param_fails() {
        let err = Binder::new()
            .view::<ItemView, Infallible>()
            .put(
                Signature::new("ItemView.put").untyped("payload"),
                |_v: ItemView, _a: Arguments| async { Ok(json_response(&json!(null))) },
            )
            .bind()
            .unwrap_err();

        assert!(matches!(err, ConfigurationError::MissingExtractor { .. }));
    }
}
