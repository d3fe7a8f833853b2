//! Ordered middleware registry.
//!
//! A [`MiddlewareChain`] holds entries in registration order. An entry
//! without a scope applies to every request; a scoped entry applies only
//! when its path pattern matches the request path.

use std::sync::Arc;

use tracing::debug;
use wyne_core::{Request, Response};
use wyne_router::{BasePath, PathPattern};

use crate::middleware::{Middleware, Next};

/// A type-erased middleware that can be stored in a vector.
pub type BoxMiddleware = Arc<dyn Middleware>;

/// One middleware registration: an optional path scope and its handlers.
#[derive(Clone)]
pub struct MiddlewareEntry {
    scope: Option<PathPattern>,
    handlers: Vec<BoxMiddleware>,
}

impl MiddlewareEntry {
    /// Creates an entry that applies to every request.
    #[must_use]
    pub fn global(handlers: Vec<BoxMiddleware>) -> Self {
        Self {
            scope: None,
            handlers,
        }
    }

    /// Creates an entry that applies only when `scope` matches.
    #[must_use]
    pub fn scoped(scope: PathPattern, handlers: Vec<BoxMiddleware>) -> Self {
        Self {
            scope: Some(scope),
            handlers,
        }
    }

    /// Returns the path scope, if any.
    #[must_use]
    pub const fn scope(&self) -> Option<&PathPattern> {
        self.scope.as_ref()
    }

    /// Returns the handlers in invocation order.
    #[must_use]
    pub fn handlers(&self) -> &[BoxMiddleware] {
        &self.handlers
    }
}

impl std::fmt::Debug for MiddlewareEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.handlers.iter().map(|m| m.name()).collect();
        f.debug_struct("MiddlewareEntry")
            .field("scope", &self.scope.as_ref().map(PathPattern::as_str))
            .field("handlers", &names)
            .finish()
    }
}

/// Result of running the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainOutcome {
    /// Every applicable middleware proceeded.
    Completed,
    /// A middleware returned without proceeding.
    Halted {
        /// Name of the middleware that stopped dispatch.
        middleware: &'static str,
    },
}

impl ChainOutcome {
    /// Returns true if dispatch should continue to route matching.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Middleware entries in registration order.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use wyne_core::{BufferedSink, Request, Response};
/// use wyne_middleware::{ChainOutcome, FnMiddleware, MiddlewareChain, MiddlewareEntry};
/// use wyne_router::{BasePath, PathPattern};
///
/// let mut chain = MiddlewareChain::new();
/// chain.push(MiddlewareEntry::global(vec![Arc::new(FnMiddleware::new(
///     "pass",
///     |_req, _res, next| next.proceed(),
/// ))]));
/// chain.push(MiddlewareEntry::scoped(
///     PathPattern::new("/admin.*").unwrap(),
///     vec![Arc::new(FnMiddleware::new("deny", |_req, res, _next| res.send("no")))],
/// ));
///
/// let mut sink = BufferedSink::new();
/// let mut request = Request::builder().uri("/admin/users").build();
/// let outcome = chain.run(&BasePath::root(), &mut request, &mut Response::new(&mut sink));
/// assert_eq!(outcome, ChainOutcome::Halted { middleware: "deny" });
/// ```
#[derive(Debug, Clone, Default)]
pub struct MiddlewareChain {
    entries: Vec<MiddlewareEntry>,
}

impl MiddlewareChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    pub fn push(&mut self, entry: MiddlewareEntry) {
        self.entries.push(entry);
    }

    /// Returns the entries in registration order.
    #[must_use]
    pub fn entries(&self) -> &[MiddlewareEntry] {
        &self.entries
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no entries are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Runs every applicable entry in order.
    ///
    /// A matching scoped entry commits its captures to the request
    /// parameters before its handlers run. The chain stops as soon as a
    /// handler returns without calling [`Next::proceed`].
    pub fn run(
        &self,
        base: &BasePath,
        request: &mut Request,
        response: &mut Response<'_>,
    ) -> ChainOutcome {
        for entry in &self.entries {
            if let Some(scope) = &entry.scope {
                match scope.captures(base, request.path()) {
                    Some(params) => request.set_params(params),
                    None => continue,
                }
            }

            for middleware in &entry.handlers {
                let mut next = Next::new();
                middleware.handle(request, response, &mut next);

                if !next.is_proceeding() {
                    debug!(
                        middleware = middleware.name(),
                        path = request.path(),
                        "middleware halted dispatch"
                    );
                    return ChainOutcome::Halted {
                        middleware: middleware.name(),
                    };
                }
            }
        }

        ChainOutcome::Completed
    }
}
