//! Request dispatch.
//!
//! A [`Dispatcher`] is the frozen result of a registration phase. It runs
//! one request cycle at a time and is shared freely between threads.
//!
//! # Request Cycle
//!
//! 1. Run the middleware chain; a middleware that does not proceed ends the cycle
//! 2. Scan routes in registration order
//! 3. The first route whose path and method both match handles the request
//! 4. A matching path with no matching method answers `405`
//! 5. No matching path answers `404`

use std::sync::Arc;

use http::{Method, StatusCode};
use tracing::{debug, info_span};
use wyne_core::{BoxHandler, Request, Response, ResponseSink};
use wyne_middleware::{ChainOutcome, MiddlewareChain};
use wyne_router::{BasePath, MethodFilter, PathPattern};

use crate::builder::DispatcherBuilder;

/// Hook invoked when no route path matches. Receives the request path.
pub type InvalidPathHook = Arc<dyn Fn(&str, &mut Response<'_>) + Send + Sync>;

/// Hook invoked when a path matches but no route accepts the method.
/// Receives the request path and method.
pub type InvalidMethodHook = Arc<dyn Fn(&str, &Method, &mut Response<'_>) + Send + Sync>;

/// A registered route.
#[derive(Clone)]
pub(crate) struct Route {
    pub(crate) method: MethodFilter,
    pub(crate) pattern: PathPattern,
    pub(crate) handler: BoxHandler,
}

/// How a request cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A route handler ran.
    Handled,
    /// A middleware returned without proceeding.
    Halted {
        /// Name of the middleware that stopped dispatch.
        middleware: &'static str,
    },
    /// No route path matched; status `404` was set.
    NotFound,
    /// A route path matched but no route accepted the method; status `405` was set.
    MethodNotAllowed,
}

impl DispatchOutcome {
    /// Returns true if a route handler ran.
    #[must_use]
    pub const fn is_handled(&self) -> bool {
        matches!(self, Self::Handled)
    }

    /// Returns the status the dispatcher itself set, if any.
    #[must_use]
    pub const fn fallback_status(&self) -> Option<StatusCode> {
        match self {
            Self::NotFound => Some(StatusCode::NOT_FOUND),
            Self::MethodNotAllowed => Some(StatusCode::METHOD_NOT_ALLOWED),
            _ => None,
        }
    }
}

/// The immutable route and middleware registry.
///
/// # Example
///
/// ```
/// use wyne_core::{BufferedSink, Request, Response};
/// use wyne_server::{DispatchOutcome, Dispatcher};
///
/// fn show_user(req: &Request, res: &mut Response<'_>) {
///     res.send(format!("user {}", req.param(0).unwrap_or_default()));
/// }
///
/// let dispatcher = Dispatcher::builder()
///     .base_path("/api")
///     .get(r"/users/(\d+)", show_user)
///     .build()
///     .unwrap();
///
/// let mut sink = BufferedSink::new();
/// let mut request = Request::builder().uri("/api/users/42").build();
/// assert_eq!(dispatcher.run(&mut request, &mut sink), DispatchOutcome::Handled);
/// assert_eq!(sink.body(), b"user 42");
/// ```
#[derive(Clone)]
pub struct Dispatcher {
    pub(crate) routes: Vec<Route>,
    pub(crate) middleware: MiddlewareChain,
    pub(crate) base_path: BasePath,
    pub(crate) on_invalid_path: Option<InvalidPathHook>,
    pub(crate) on_invalid_method: Option<InvalidMethodHook>,
}

impl Dispatcher {
    /// Starts a registration phase.
    #[must_use]
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    /// Re-opens a registration phase with a copy of this registry.
    #[must_use]
    pub fn to_builder(&self) -> DispatcherBuilder {
        DispatcherBuilder::from_dispatcher(self.clone())
    }

    /// Returns the configured base path.
    #[must_use]
    pub const fn base_path(&self) -> &BasePath {
        &self.base_path
    }

    /// Returns the middleware chain.
    #[must_use]
    pub const fn middleware(&self) -> &MiddlewareChain {
        &self.middleware
    }

    /// Returns the registered routes as `(method, path specifier)` in order.
    pub fn routes(&self) -> impl Iterator<Item = (MethodFilter, &str)> {
        self.routes.iter().map(|r| (r.method, r.pattern.as_str()))
    }

    /// Returns the number of registered routes.
    #[must_use]
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Dispatches one request using the configured base path.
    pub fn run(&self, request: &mut Request, sink: &mut dyn ResponseSink) -> DispatchOutcome {
        self.run_with_base(&self.base_path, request, sink)
    }

    /// Dispatches one request using an explicit base path.
    pub fn run_with_base(
        &self,
        base: &BasePath,
        request: &mut Request,
        sink: &mut dyn ResponseSink,
    ) -> DispatchOutcome {
        let span = info_span!(
            "dispatch",
            request_id = %request.request_id(),
            http.method = %request.method(),
            http.path = %request.path(),
        );
        let _guard = span.enter();

        let mut response = Response::new(sink);

        if let ChainOutcome::Halted { middleware } =
            self.middleware.run(base, request, &mut response)
        {
            return DispatchOutcome::Halted { middleware };
        }

        let mut found_path = false;
        for route in &self.routes {
            let Some(params) = route.pattern.captures(base, request.path()) else {
                continue;
            };
            found_path = true;

            if !route.method.matches(request.method()) {
                continue;
            }

            debug!(
                route = route.pattern.as_str(),
                method = %route.method,
                params = params.len(),
                "route matched"
            );
            request.set_params(params);
            route.handler.handle(request, &mut response);
            return DispatchOutcome::Handled;
        }

        if found_path {
            debug!("path matched but method did not");
            response.status(StatusCode::METHOD_NOT_ALLOWED);
            if let Some(hook) = &self.on_invalid_method {
                hook(request.path(), request.method(), &mut response);
            }
            DispatchOutcome::MethodNotAllowed
        } else {
            debug!("no route matched");
            response.status(StatusCode::NOT_FOUND);
            if let Some(hook) = &self.on_invalid_path {
                hook(request.path(), &mut response);
            }
            DispatchOutcome::NotFound
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let routes: Vec<String> = self
            .routes()
            .map(|(method, path)| format!("{method} {path}"))
            .collect();
        f.debug_struct("Dispatcher")
            .field("base_path", &self.base_path.as_str())
            .field("routes", &routes)
            .field("middleware", &self.middleware)
            .field("on_invalid_path", &self.on_invalid_path.is_some())
            .field("on_invalid_method", &self.on_invalid_method.is_some())
            .finish()
    }
}
