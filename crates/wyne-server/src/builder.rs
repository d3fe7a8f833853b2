//! Registration phase.
//!
//! [`DispatcherBuilder`] collects routes, middleware and fallback hooks in
//! registration order, then freezes them into a [`Dispatcher`]. Pattern
//! errors are recorded as they happen and reported by [`build`].
//!
//! [`build`]: DispatcherBuilder::build

use std::sync::Arc;

use http::Method;
use tracing::debug;
use wyne_config::DispatchConfig;
use wyne_core::{BoxHandler, Controller, ControllerHandler, Handler, Response};
use wyne_middleware::{BoxMiddleware, Middleware, MiddlewareChain, MiddlewareEntry};
use wyne_router::{BasePath, MethodFilter, PathPattern};

use crate::dispatcher::{Dispatcher, InvalidMethodHook, InvalidPathHook, Route};
use crate::error::{DispatchError, DispatchResult};

/// The target of a [`RouteDescriptor`].
#[derive(Clone)]
pub enum RouteController {
    /// Anything invocable as a handler.
    Handler(BoxHandler),
    /// An object answering through [`Controller::execute`].
    Controller(Arc<dyn Controller>),
}

impl RouteController {
    /// Wraps a handler.
    pub fn handler(handler: impl Handler) -> Self {
        Self::Handler(Arc::new(handler))
    }

    /// Wraps a controller.
    pub fn controller(controller: impl Controller) -> Self {
        Self::Controller(Arc::new(controller))
    }

    /// Resolves the target into a single handler.
    #[must_use]
    pub fn into_handler(self) -> BoxHandler {
        match self {
            Self::Handler(handler) => handler,
            Self::Controller(controller) => Arc::new(ControllerHandler::new(controller)),
        }
    }
}

impl std::fmt::Debug for RouteController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Handler(_) => f.write_str("RouteController::Handler"),
            Self::Controller(_) => f.write_str("RouteController::Controller"),
        }
    }
}

/// One route of a bulk registration.
///
/// # Example
///
/// ```
/// use wyne_core::{Controller, Request, Response};
/// use wyne_server::{Dispatcher, RouteController, RouteDescriptor};
///
/// struct Users;
///
/// impl Controller for Users {
///     fn execute(&self, _req: &Request, res: &mut Response<'_>) {
///         res.send("users");
///     }
/// }
///
/// let dispatcher = Dispatcher::builder()
///     .register_many([
///         RouteDescriptor::new("get", "/users", RouteController::controller(Users)),
///         RouteDescriptor::new("all", "/health", RouteController::handler(
///             |_req: &Request, res: &mut Response<'_>| res.send("ok"),
///         )),
///     ])
///     .build()
///     .unwrap();
/// assert_eq!(dispatcher.route_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct RouteDescriptor {
    /// Method name, case-insensitive; `all` matches any method.
    pub method: String,
    /// Path specifier.
    pub path: String,
    /// Route target.
    pub controller: RouteController,
}

impl RouteDescriptor {
    /// Creates a descriptor.
    pub fn new(
        method: impl Into<String>,
        path: impl Into<String>,
        controller: RouteController,
    ) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            controller,
        }
    }
}

/// Builder for a [`Dispatcher`].
///
/// # Example
///
/// ```
/// use wyne_core::{Request, Response};
/// use wyne_middleware::Next;
/// use wyne_server::Dispatcher;
///
/// let dispatcher = Dispatcher::builder()
///     .use_middleware(|_req: &mut Request, res: &mut Response<'_>, next: &mut Next| {
///         res.set_header("X-Powered-By", "wyne");
///         next.proceed();
///     })
///     .get("/", |_req: &Request, res: &mut Response<'_>| res.send("home"))
///     .on_invalid_path(|path, res| res.send(format!("{path} not found")))
///     .build()
///     .unwrap();
/// assert_eq!(dispatcher.route_count(), 1);
/// ```
pub struct DispatcherBuilder {
    routes: Vec<Route>,
    middleware: MiddlewareChain,
    base_path: BasePath,
    on_invalid_path: Option<InvalidPathHook>,
    on_invalid_method: Option<InvalidMethodHook>,
    errors: Vec<DispatchError>,
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatcherBuilder {
    /// Creates an empty builder with the root base path.
    #[must_use]
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            middleware: MiddlewareChain::new(),
            base_path: BasePath::root(),
            on_invalid_path: None,
            on_invalid_method: None,
            errors: Vec::new(),
        }
    }

    pub(crate) fn from_dispatcher(dispatcher: Dispatcher) -> Self {
        Self {
            routes: dispatcher.routes,
            middleware: dispatcher.middleware,
            base_path: dispatcher.base_path,
            on_invalid_path: dispatcher.on_invalid_path,
            on_invalid_method: dispatcher.on_invalid_method,
            errors: Vec::new(),
        }
    }

    /// Applies dispatch configuration.
    #[must_use]
    pub fn from_config(self, config: &DispatchConfig) -> Self {
        self.base_path(&config.base_path)
    }

    /// Sets the base path used by [`Dispatcher::run`].
    #[must_use]
    pub fn base_path(mut self, base_path: &str) -> Self {
        match BasePath::new(base_path) {
            Ok(base) => self.base_path = base,
            Err(source) => self.errors.push(DispatchError::InvalidBasePath(source)),
        }
        self
    }

    /// Appends a route.
    #[must_use]
    pub fn route<H: Handler>(self, method: MethodFilter, path: &str, handler: H) -> Self {
        self.route_boxed(method, path, Arc::new(handler))
    }

    fn route_boxed(mut self, method: MethodFilter, path: &str, handler: BoxHandler) -> Self {
        match PathPattern::new(path) {
            Ok(pattern) => {
                debug!(method = %method, path, "route registered");
                self.routes.push(Route {
                    method,
                    pattern,
                    handler,
                });
            }
            Err(source) => self.errors.push(DispatchError::InvalidRoute { method, source }),
        }
        self
    }

    /// Appends a route that accepts every method.
    #[must_use]
    pub fn all<H: Handler>(self, path: &str, handler: H) -> Self {
        self.route(MethodFilter::All, path, handler)
    }

    /// Appends a GET route.
    #[must_use]
    pub fn get<H: Handler>(self, path: &str, handler: H) -> Self {
        self.route(MethodFilter::Get, path, handler)
    }

    /// Appends a HEAD route.
    #[must_use]
    pub fn head<H: Handler>(self, path: &str, handler: H) -> Self {
        self.route(MethodFilter::Head, path, handler)
    }

    /// Appends a POST route.
    #[must_use]
    pub fn post<H: Handler>(self, path: &str, handler: H) -> Self {
        self.route(MethodFilter::Post, path, handler)
    }

    /// Appends a PUT route.
    #[must_use]
    pub fn put<H: Handler>(self, path: &str, handler: H) -> Self {
        self.route(MethodFilter::Put, path, handler)
    }

    /// Appends a DELETE route.
    #[must_use]
    pub fn delete<H: Handler>(self, path: &str, handler: H) -> Self {
        self.route(MethodFilter::Delete, path, handler)
    }

    /// Appends a CONNECT route.
    #[must_use]
    pub fn connect<H: Handler>(self, path: &str, handler: H) -> Self {
        self.route(MethodFilter::Connect, path, handler)
    }

    /// Appends an OPTIONS route.
    #[must_use]
    pub fn options<H: Handler>(self, path: &str, handler: H) -> Self {
        self.route(MethodFilter::Options, path, handler)
    }

    /// Appends a TRACE route.
    #[must_use]
    pub fn trace<H: Handler>(self, path: &str, handler: H) -> Self {
        self.route(MethodFilter::Trace, path, handler)
    }

    /// Appends a PATCH route.
    #[must_use]
    pub fn patch<H: Handler>(self, path: &str, handler: H) -> Self {
        self.route(MethodFilter::Patch, path, handler)
    }

    /// Appends routes from descriptors, in order.
    ///
    /// Controllers are resolved to handlers here, once.
    #[must_use]
    pub fn register_many<I>(mut self, descriptors: I) -> Self
    where
        I: IntoIterator<Item = RouteDescriptor>,
    {
        for descriptor in descriptors {
            match descriptor.method.parse::<MethodFilter>() {
                Ok(method) => {
                    self = self.route_boxed(
                        method,
                        &descriptor.path,
                        descriptor.controller.into_handler(),
                    );
                }
                Err(source) => self.errors.push(DispatchError::InvalidDescriptor {
                    path: descriptor.path,
                    source,
                }),
            }
        }
        self
    }

    /// Appends a middleware that runs for every request.
    #[must_use]
    pub fn use_middleware<M: Middleware>(self, middleware: M) -> Self {
        self.use_all(vec![Arc::new(middleware)])
    }

    /// Appends an entry of middleware that run for every request, in order.
    #[must_use]
    pub fn use_all(mut self, handlers: Vec<BoxMiddleware>) -> Self {
        self.middleware.push(MiddlewareEntry::global(handlers));
        self
    }

    /// Appends a middleware that runs only when `path` matches.
    #[must_use]
    pub fn use_at<M: Middleware>(self, path: &str, middleware: M) -> Self {
        self.use_scoped(path, vec![Arc::new(middleware)])
    }

    /// Appends an entry of middleware that run only when `path` matches.
    #[must_use]
    pub fn use_scoped(mut self, path: &str, handlers: Vec<BoxMiddleware>) -> Self {
        match PathPattern::new(path) {
            Ok(scope) => self.middleware.push(MiddlewareEntry::scoped(scope, handlers)),
            Err(source) => self.errors.push(DispatchError::InvalidScope { source }),
        }
        self
    }

    /// Sets the hook invoked after a `404`.
    #[must_use]
    pub fn on_invalid_path<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str, &mut Response<'_>) + Send + Sync + 'static,
    {
        self.on_invalid_path = Some(Arc::new(hook));
        self
    }

    /// Sets the hook invoked after a `405`.
    #[must_use]
    pub fn on_invalid_method<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str, &Method, &mut Response<'_>) + Send + Sync + 'static,
    {
        self.on_invalid_method = Some(Arc::new(hook));
        self
    }

    /// Freezes the registry.
    ///
    /// Returns the first registration error, if any.
    pub fn build(self) -> DispatchResult<Dispatcher> {
        if let Some(error) = self.errors.into_iter().next() {
            return Err(error);
        }

        Ok(Dispatcher {
            routes: self.routes,
            middleware: self.middleware,
            base_path: self.base_path,
            on_invalid_path: self.on_invalid_path,
            on_invalid_method: self.on_invalid_method,
        })
    }
}

impl std::fmt::Debug for DispatcherBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatcherBuilder")
            .field("base_path", &self.base_path.as_str())
            .field("routes", &self.routes.len())
            .field("middleware", &self.middleware.len())
            .field("errors", &self.errors)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wyne_core::{BufferedSink, Request};

    struct Named(&'static str);

    impl Controller for Named {
        fn execute(&self, _req: &Request, res: &mut Response<'_>) {
            res.send(self.0);
        }
    }

    fn body_for(dispatcher: &Dispatcher, method: Method, uri: &str) -> Vec<u8> {
        let mut request = Request::builder().method(method).uri(uri).build();
        let mut sink = BufferedSink::new();
        dispatcher.run(&mut request, &mut sink);
        sink.body().to_vec()
    }

    #[test]
    fn test_every_verb_helper() {
        let dispatcher = DispatcherBuilder::new()
            .get("/", ControllerHandler::new(Named("get")))
            .head("/", ControllerHandler::new(Named("head")))
            .post("/", ControllerHandler::new(Named("post")))
            .put("/", ControllerHandler::new(Named("put")))
            .delete("/", ControllerHandler::new(Named("delete")))
            .connect("/", ControllerHandler::new(Named("connect")))
            .options("/", ControllerHandler::new(Named("options")))
            .trace("/", ControllerHandler::new(Named("trace")))
            .patch("/", ControllerHandler::new(Named("patch")))
            .all("/", ControllerHandler::new(Named("all")))
            .build()
            .unwrap();

        for (method, expected) in [
            (Method::GET, "get"),
            (Method::HEAD, "head"),
            (Method::POST, "post"),
            (Method::PUT, "put"),
            (Method::DELETE, "delete"),
            (Method::CONNECT, "connect"),
            (Method::OPTIONS, "options"),
            (Method::TRACE, "trace"),
            (Method::PATCH, "patch"),
        ] {
            assert_eq!(body_for(&dispatcher, method, "/"), expected.as_bytes());
        }

        let purge = Method::from_bytes(b"PURGE").unwrap();
        assert_eq!(body_for(&dispatcher, purge, "/"), b"all");
    }

    #[test]
    fn test_register_many_resolves_controllers() {
        let dispatcher = DispatcherBuilder::new()
            .register_many([
                RouteDescriptor::new("POST", "/a", RouteController::controller(Named("ctrl"))),
                RouteDescriptor::new(
                    "get",
                    "/a",
                    RouteController::handler(ControllerHandler::new(Named("handler"))),
                ),
            ])
            .build()
            .unwrap();

        assert_eq!(body_for(&dispatcher, Method::POST, "/a"), b"ctrl");
        assert_eq!(body_for(&dispatcher, Method::GET, "/a"), b"handler");
    }

    #[test]
    fn test_register_many_unknown_method() {
        let err = DispatcherBuilder::new()
            .register_many([RouteDescriptor::new(
                "FETCH",
                "/a",
                RouteController::controller(Named("x")),
            )])
            .build()
            .unwrap_err();
        assert!(matches!(err, DispatchError::InvalidDescriptor { ref path, .. } if path == "/a"));
    }

    #[test]
    fn test_invalid_route_reported_first() {
        let err = DispatcherBuilder::new()
            .get("/ok", ControllerHandler::new(Named("ok")))
            .post("/bad(", ControllerHandler::new(Named("bad")))
            .use_at("/also[bad", |_req: &mut Request, _res: &mut Response<'_>, _next: &mut wyne_middleware::Next| {})
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            DispatchError::InvalidRoute {
                method: MethodFilter::Post,
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_scope() {
        let err = DispatcherBuilder::new()
            .use_scoped("/x(", Vec::new())
            .build()
            .unwrap_err();
        assert!(matches!(err, DispatchError::InvalidScope { .. }));
    }

    #[test]
    fn test_invalid_base_path() {
        let err = DispatcherBuilder::new().base_path("/api(").build().unwrap_err();
        assert!(matches!(err, DispatchError::InvalidBasePath(_)));
    }

    #[test]
    fn test_from_config() {
        let config = DispatchConfig {
            base_path: "/api".to_string(),
        };
        let dispatcher = DispatcherBuilder::new()
            .from_config(&config)
            .get("/x", ControllerHandler::new(Named("x")))
            .build()
            .unwrap();
        assert_eq!(dispatcher.base_path().as_str(), "/api");
        assert_eq!(body_for(&dispatcher, Method::GET, "/api/x"), b"x");
    }

    #[test]
    fn test_to_builder_keeps_registrations() {
        let dispatcher = DispatcherBuilder::new()
            .base_path("/v1")
            .get("/a", ControllerHandler::new(Named("a")))
            .build()
            .unwrap();

        let extended = dispatcher
            .to_builder()
            .get("/b", ControllerHandler::new(Named("b")))
            .build()
            .unwrap();

        assert_eq!(dispatcher.route_count(), 1);
        assert_eq!(extended.route_count(), 2);
        assert_eq!(body_for(&extended, Method::GET, "/v1/a"), b"a");
        assert_eq!(body_for(&extended, Method::GET, "/v1/b"), b"b");
    }
}
