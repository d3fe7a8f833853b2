//! Core middleware trait and types.
//!
//! This module defines the [`Middleware`] trait and the [`Next`] continuation
//! signal. A middleware runs before route dispatch and decides whether
//! dispatch continues by calling [`Next::proceed`]. Returning without calling
//! it stops the whole dispatch right there.
//!
//! # Example
//!
//! ```
//! use http::StatusCode;
//! use wyne_core::{Request, Response};
//! use wyne_middleware::{Middleware, Next};
//!
//! struct RequireToken;
//!
//! impl Middleware for RequireToken {
//!     fn name(&self) -> &'static str {
//!         "require-token"
//!     }
//!
//!     fn handle(&self, req: &mut Request, res: &mut Response<'_>, next: &mut Next) {
//!         if req.header("authorization").is_some() {
//!             next.proceed();
//!         } else {
//!             res.status(StatusCode::UNAUTHORIZED);
//!             res.send("missing token");
//!         }
//!     }
//! }
//! ```

use wyne_core::{Request, Response};

/// The core middleware trait.
///
/// # Invariants
///
/// - Middleware MUST call `next.proceed()` to let dispatch continue
/// - Output written by middleware is never retracted
pub trait Middleware: Send + Sync + 'static {
    /// Returns the name of this middleware, used in logs and outcomes.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Processes the request.
    fn handle(&self, request: &mut Request, response: &mut Response<'_>, next: &mut Next);
}

impl<F> Middleware for F
where
    F: Fn(&mut Request, &mut Response<'_>, &mut Next) + Send + Sync + 'static,
{
    fn handle(&self, request: &mut Request, response: &mut Response<'_>, next: &mut Next) {
        self(request, response, next);
    }
}

/// Continuation signal handed to each middleware.
///
/// A fresh signal is created for every middleware invocation.
#[derive(Debug, Default)]
pub struct Next {
    proceed: bool,
}

impl Next {
    /// Creates a signal that has not been raised.
    #[must_use]
    pub const fn new() -> Self {
        Self { proceed: false }
    }

    /// Lets dispatch continue after the current middleware returns.
    pub fn proceed(&mut self) {
        self.proceed = true;
    }

    /// Returns true if [`proceed`](Self::proceed) was called.
    #[must_use]
    pub const fn is_proceeding(&self) -> bool {
        self.proceed
    }
}

/// A named middleware created from a closure.
///
/// # Example
///
/// ```
/// use wyne_middleware::{FnMiddleware, Middleware};
///
/// let cors = FnMiddleware::new("cors", |_req, res, next| {
///     res.set_header("Access-Control-Allow-Origin", "*");
///     next.proceed();
/// });
/// assert_eq!(cors.name(), "cors");
/// ```
pub struct FnMiddleware<F> {
    name: &'static str,
    func: F,
}

impl<F> FnMiddleware<F>
where
    F: Fn(&mut Request, &mut Response<'_>, &mut Next) + Send + Sync + 'static,
{
    /// Creates a new named middleware.
    pub const fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<F> Middleware for FnMiddleware<F>
where
    F: Fn(&mut Request, &mut Response<'_>, &mut Next) + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn handle(&self, request: &mut Request, response: &mut Response<'_>, next: &mut Next) {
        (self.func)(request, response, next);
    }
}

impl<F> std::fmt::Debug for FnMiddleware<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnMiddleware")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
