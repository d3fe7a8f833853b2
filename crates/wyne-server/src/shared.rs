//! Registration while serving.
//!
//! [`SharedDispatcher`] holds the current [`Dispatcher`] behind an `Arc`.
//! Requests run against a snapshot; updates build a new dispatcher from a
//! copy of the current one and swap it in. A request never observes a
//! half-applied update.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::debug;
use wyne_core::{Request, ResponseSink};

use crate::builder::DispatcherBuilder;
use crate::dispatcher::{DispatchOutcome, Dispatcher};
use crate::error::DispatchResult;

/// A dispatcher that can be replaced while requests are being served.
///
/// # Example
///
/// ```
/// use wyne_core::{BufferedSink, Request, Response};
/// use wyne_server::{DispatchOutcome, Dispatcher, SharedDispatcher};
///
/// let shared = SharedDispatcher::new(Dispatcher::builder().build().unwrap());
///
/// shared
///     .update(|builder| builder.get("/late", |_req: &Request, res: &mut Response<'_>| res.send("added")))
///     .unwrap();
///
/// let mut request = Request::builder().uri("/late").build();
/// let mut sink = BufferedSink::new();
/// assert_eq!(shared.run(&mut request, &mut sink), DispatchOutcome::Handled);
/// ```
#[derive(Debug, Clone)]
pub struct SharedDispatcher {
    current: Arc<RwLock<Arc<Dispatcher>>>,
    updates: Arc<Mutex<()>>,
}

impl SharedDispatcher {
    /// Wraps a dispatcher.
    #[must_use]
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(dispatcher))),
            updates: Arc::new(Mutex::new(())),
        }
    }

    /// Returns the current dispatcher.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Dispatcher> {
        Arc::clone(&self.current.read())
    }

    /// Dispatches one request against the current snapshot.
    pub fn run(&self, request: &mut Request, sink: &mut dyn ResponseSink) -> DispatchOutcome {
        self.snapshot().run(request, sink)
    }

    /// Applies `f` to a copy of the current registry and swaps in the result.
    ///
    /// On a registration error the current dispatcher is kept. Updates are
    /// applied one at a time. `f` may call [`snapshot`](Self::snapshot) or
    /// [`run`](Self::run) but must not call `update` on the same dispatcher.
    pub fn update<F>(&self, f: F) -> DispatchResult<()>
    where
        F: FnOnce(DispatcherBuilder) -> DispatcherBuilder,
    {
        let _guard = self.updates.lock();
        let next = f(self.snapshot().to_builder()).build()?;
        debug!(routes = next.route_count(), "dispatcher replaced");
        *self.current.write() = Arc::new(next);
        Ok(())
    }
}

impl From<Dispatcher> for SharedDispatcher {
    fn from(dispatcher: Dispatcher) -> Self {
        Self::new(dispatcher)
    }
}
