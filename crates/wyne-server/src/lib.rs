//! # Wyne Server
//!
//! Request dispatcher for the Wyne toolkit.
//!
//! This crate ties routes, middleware and fallback hooks together:
//!
//! - [`DispatcherBuilder`] - Registration phase: routes, middleware, hooks, base path
//! - [`Dispatcher`] - Serving phase: immutable, `Send + Sync`, runs one request cycle
//! - [`SharedDispatcher`] - Snapshot-swap holder for registering routes while serving
//!
//! Dispatch is synchronous and performs no I/O; transports feed it a
//! [`Request`](wyne_core::Request) and a [`ResponseSink`](wyne_core::ResponseSink).
//!
//! ## Example
//!
//! ```rust
//! use http::{Method, StatusCode};
//! use wyne_core::{BufferedSink, Request, Response};
//! use wyne_server::{DispatchOutcome, Dispatcher};
//!
//! let dispatcher = Dispatcher::builder()
//!     .get("/a", |_req: &Request, res: &mut Response<'_>| res.send("a"))
//!     .on_invalid_method(|path, method, res| res.send(format!("{method} not allowed on {path}")))
//!     .build()
//!     .unwrap();
//!
//! let mut request = Request::builder().method(Method::POST).uri("/a").build();
//! let mut sink = BufferedSink::new();
//! assert_eq!(dispatcher.run(&mut request, &mut sink), DispatchOutcome::MethodNotAllowed);
//! assert_eq!(sink.status(), StatusCode::METHOD_NOT_ALLOWED);
//! assert_eq!(sink.body(), b"POST not allowed on /a");
//! ```

#![doc(html_root_url = "https://docs.rs/wyne-server/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod builder;
mod dispatcher;
mod error;
mod shared;

pub use builder::{DispatcherBuilder, RouteController, RouteDescriptor};
pub use dispatcher::{DispatchOutcome, Dispatcher, InvalidMethodHook, InvalidPathHook};
pub use error::{DispatchError, DispatchResult};
pub use shared::SharedDispatcher;
