//! Handler abstraction.
//!
//! Every route target is a [`Handler`]. Plain functions and closures are
//! handlers through a blanket implementation; objects with an `execute`
//! method implement [`Controller`] and are adapted with [`ControllerHandler`].

use std::sync::Arc;

use crate::request::Request;
use crate::response::Response;

/// A route target.
///
/// # Example
///
/// ```
/// use wyne_core::{BufferedSink, Handler, Request, Response};
///
/// fn hello(_req: &Request, res: &mut Response<'_>) {
///     res.send("hello");
/// }
///
/// let mut sink = BufferedSink::new();
/// hello.handle(&Request::builder().build(), &mut Response::new(&mut sink));
/// assert_eq!(sink.body(), b"hello");
/// ```
pub trait Handler: Send + Sync + 'static {
    /// Handles a request.
    fn handle(&self, request: &Request, response: &mut Response<'_>);
}

impl<F> Handler for F
where
    F: Fn(&Request, &mut Response<'_>) + Send + Sync + 'static,
{
    fn handle(&self, request: &Request, response: &mut Response<'_>) {
        self(request, response);
    }
}

/// A shared, type-erased handler.
pub type BoxHandler = Arc<dyn Handler>;

/// An object that answers a route through its `execute` method.
///
/// # Example
///
/// ```
/// use wyne_core::{BufferedSink, Controller, ControllerHandler, Handler, Request, Response};
///
/// struct Health;
///
/// impl Controller for Health {
///     fn execute(&self, _req: &Request, res: &mut Response<'_>) {
///         res.send("ok");
///     }
/// }
///
/// let handler = ControllerHandler::new(Health);
/// let mut sink = BufferedSink::new();
/// handler.handle(&Request::builder().build(), &mut Response::new(&mut sink));
/// assert_eq!(sink.body(), b"ok");
/// ```
pub trait Controller: Send + Sync + 'static {
    /// Handles a request.
    fn execute(&self, request: &Request, response: &mut Response<'_>);
}

/// Adapts a [`Controller`] to the [`Handler`] interface.
#[derive(Debug, Clone)]
pub struct ControllerHandler<C> {
    controller: C,
}

impl<C: Controller> ControllerHandler<C> {
    /// Wraps a controller.
    #[must_use]
    pub const fn new(controller: C) -> Self {
        Self { controller }
    }

    /// Returns the wrapped controller.
    #[must_use]
    pub const fn controller(&self) -> &C {
        &self.controller
    }
}

impl<C: Controller> Handler for ControllerHandler<C> {
    fn handle(&self, request: &Request, response: &mut Response<'_>) {
        self.controller.execute(request, response);
    }
}

impl Controller for Arc<dyn Controller> {
    fn execute(&self, request: &Request, response: &mut Response<'_>) {
        (**self).execute(request, response);
    }
}
