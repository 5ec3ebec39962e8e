//! Handler binding.
//!
//! A [`Binder`] turns an async handler plus its [`Signature`] into a
//! [`BoundHandler`] that accepts a raw request, resolves the arguments and
//! invokes the handler.

use std::future::Future;
use std::sync::Arc;

use keryx_extract::{ConfigurationError, ExtractSettings, RequestContext, Response};

use crate::arguments::Arguments;
use crate::engine::BindingEngine;
use crate::plan::ResolutionPlan;
use crate::registry::{HandlerId, PlanRegistry};
use crate::signature::Signature;
use crate::view::{View, ViewBinder};

/// An async handler taking resolved [`Arguments`].
///
/// Implemented for every `Fn(Arguments) -> impl Future<Output = Result<Response, E>>`.
/// The handler's own error type `E` passes through binding untouched.
///
/// # Example
///
/// ```rust
/// use keryx_bind::{Arguments, Handler};
/// use keryx_extract::response::json_response;
/// use keryx_extract::Response;
/// use std::convert::Infallible;
///
/// async fn ping(_args: Arguments) -> Result<Response, Infallible> {
///     Ok(json_response(&"pong"))
/// }
///
/// fn assert_handler<H: Handler<Infallible>>(_: &H) {}
/// assert_handler(&ping);
/// ```
pub trait Handler<E>: Send + Sync + 'static {
    /// Invokes the handler.
    fn call(&self, args: Arguments) -> impl Future<Output = Result<Response, E>> + Send;
}

impl<F, Fut, E> Handler<E> for F
where
    F: Fn(Arguments) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, E>> + Send,
{
    fn call(&self, args: Arguments) -> impl Future<Output = Result<Response, E>> + Send {
        (self)(args)
    }
}

/// Registers handlers and views against a shared plan registry.
///
/// # Example
///
/// ```rust
/// use keryx_bind::{Arguments, Binder, Signature};
/// use keryx_extract::response::json_response;
/// use keryx_extract::{ElementType, ExtractorKind, RequestContext, Response};
/// use serde_json::json;
/// use std::convert::Infallible;
///
/// async fn add(args: Arguments) -> Result<Response, Infallible> {
///     let a: i64 = args.get("a").unwrap();
///     let b: i64 = args.get("b").unwrap();
///     Ok(json_response(&json!({ "result": a + b })))
/// }
///
/// # tokio_test::block_on(async {
/// let binder = Binder::new();
/// let handler = binder
///     .bind(
///         Signature::new("add")
///             .param("a", ExtractorKind::Query.subscript(ElementType::Int))
///             .param_with_default("b", ExtractorKind::Query.subscript(ElementType::Int), 10),
///         add,
///     )
///     .unwrap();
///
/// let request = RequestContext::builder()
///     .uri(http::Uri::from_static("/query?a=5"))
///     .build();
/// let response = handler.call::<Infallible>(request).await.unwrap();
/// assert_eq!(response.body().as_ref(), br#"{"result":15}"#);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct Binder {
    registry: Arc<PlanRegistry>,
    engine: Arc<BindingEngine>,
}

impl Default for Binder {
    fn default() -> Self {
        Self::new()
    }
}

impl Binder {
    /// Creates a binder with its own registry and default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_engine(Arc::new(PlanRegistry::new()), BindingEngine::default())
    }

    /// Creates a binder over an existing registry and engine.
    #[must_use]
    pub fn with_engine(registry: Arc<PlanRegistry>, engine: BindingEngine) -> Self {
        Self {
            registry,
            engine: Arc::new(engine),
        }
    }

    /// Creates a binder using `settings` for every extraction.
    #[must_use]
    pub fn with_settings(settings: ExtractSettings) -> Self {
        Self::with_engine(Arc::new(PlanRegistry::new()), BindingEngine::new(settings))
    }

    /// Returns the plan registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<PlanRegistry> {
        &self.registry
    }

    /// Returns the binding engine.
    #[must_use]
    pub fn engine(&self) -> &Arc<BindingEngine> {
        &self.engine
    }

    /// Builds (or reuses) the plan for `handler` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if the signature cannot be planned, or
    /// if the same handler and name were bound earlier with other parameters.
    pub fn bind<H>(&self, signature: Signature, handler: H) -> Result<BoundHandler<H>, ConfigurationError>
    where
        H: Send + Sync + 'static,
    {
        let id = HandlerId::of::<H>(signature.name());
        let plan = self.registry.plan_for(id, &signature)?;

        tracing::debug!(handler = signature.name(), params = plan.len(), "handler bound");
        Ok(BoundHandler {
            plan,
            engine: Arc::clone(&self.engine),
            handler,
        })
    }

    /// Starts registering the verb methods of view type `V`.
    #[must_use]
    pub fn view<V: View, E: Send + 'static>(&self) -> ViewBinder<V, E> {
        ViewBinder::new(self.clone())
    }
}

/// A handler wrapped with its resolution plan.
pub struct BoundHandler<H> {
    plan: Arc<ResolutionPlan>,
    engine: Arc<BindingEngine>,
    handler: H,
}

impl<H> std::fmt::Debug for BoundHandler<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundHandler")
            .field("plan", &self.plan)
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

impl<H> BoundHandler<H> {
    /// Returns the resolution plan.
    #[must_use]
    pub fn plan(&self) -> &Arc<ResolutionPlan> {
        &self.plan
    }

    /// Binds `request` and invokes the handler.
    ///
    /// A binding failure is answered with its error response and the handler
    /// is not called. Otherwise the handler's result is returned unchanged.
    ///
    /// # Errors
    ///
    /// Only errors produced by the handler itself.
    pub async fn call<E>(&self, request: impl Into<Arc<RequestContext>>) -> Result<Response, E>
    where
        H: Handler<E>,
    {
        let request = request.into();
        match self.engine.resolve(&self.plan, &request).await {
            Ok(args) => self.handler.call(args).await,
            Err(err) => Ok(err.into_response()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{StatusCode, Uri};
    use keryx_extract::response::json_response;
    use keryx_extract::{ElementType, ExtractorKind};
    use serde_json::json;
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn add(args: Arguments) -> Result<Response, Infallible> {
        let a: i64 = args.get("a").unwrap();
        let b: i64 = args.get("b").unwrap();
        Ok(json_response(&json!({ "result": a + b })))
    }

    fn add_signature() -> Signature {
        Signature::new("add")
            .param("a", ExtractorKind::Query.subscript(ElementType::Int))
            .param_with_default("b", ExtractorKind::Query.subscript(ElementType::Int), 10)
    }

    fn get(uri: &'static str) -> RequestContext {
        RequestContext::builder().uri(Uri::from_static(uri)).build()
    }

    #[tokio::test]
    async fn test_bound_handler_success() {
        let handler = Binder::new().bind(add_signature(), add).unwrap();

        let response = handler.call::<Infallible>(get("/query?a=5&b=10")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body().as_ref(), br#"{"result":15}"#);
    }

    #[tokio::test]
    async fn test_bound_handler_rejection() {
        let handler = Binder::new().bind(add_signature(), add).unwrap();

        let response = handler.call::<Infallible>(get("/query?b=10")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.body().as_ref(), b"Missing query parameter 'a'.");
    }

    #[tokio::test]
    async fn test_handler_not_called_on_rejection() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let handler = Binder::new()
            .bind(add_signature(), move |_args: Arguments| {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, Infallible>(json_response(&json!(null)))
                }
            })
            .unwrap();

        handler.call::<Infallible>(get("/query")).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        handler.call::<Infallible>(get("/query?a=1")).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_handler_errors_pass_through() {
        #[derive(Debug, PartialEq)]
        struct Boom;

        let handler = Binder::new()
            .bind(add_signature(), |_args: Arguments| async { Err::<Response, _>(Boom) })
            .unwrap();

        assert_eq!(handler.call::<Boom>(get("/query?a=1")).await.unwrap_err(), Boom);
    }

    #[test]
    fn test_bind_is_idempotent() {
        let binder = Binder::new();
        let first = binder.bind(add_signature(), add).unwrap();
        let second = binder.bind(add_signature(), add).unwrap();

        assert!(Arc::ptr_eq(first.plan(), second.plan()));
        assert_eq!(binder.registry().len(), 1);
    }

    #[test]
    fn test_untyped_param_fails_registration() {
        let err = Binder::new()
            .bind(Signature::new("add").param("a", ExtractorKind::Query).untyped("b"), add)
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "parameter 'b' of handler 'add' has no extraction type"
        );
    }
}
