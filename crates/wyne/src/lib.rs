//! # Wyne
//!
//! **HTTP request dispatch and declarative input validation**
//!
//! Wyne provides two independent pieces that meet inside handlers:
//!
//! - **Dispatch** – regex path patterns, path-scoped middleware with explicit
//!   continuation, method resolution and `404` / `405` fallback hooks
//! - **Validation** – schemas of typed filters with defaults, optionality,
//!   nesting and custom element types
//!
//! Dispatch is synchronous and transport-agnostic: any server that can build
//! an `http::Request<Bytes>` and drain a [`ResponseSink`](core::ResponseSink)
//! can drive it.
//!
//! ## Quick Start
//!
//! ```rust
//! use wyne::prelude::*;
//! use serde_json::json;
//!
//! fn create_user(req: &Request, res: &mut Response<'_>) {
//!     let schema = Schema::new()
//!         .field("name", FilterSpec::string().trim())
//!         .field("admin", FilterSpec::boolean().default_value(false));
//!
//!     match validate(req.body(), &schema) {
//!         Ok(user) => {
//!             res.status(StatusCode::CREATED);
//!             let _ = res.json(&user);
//!         }
//!         Err(err) => {
//!             res.status(StatusCode::UNPROCESSABLE_ENTITY);
//!             res.send(err.to_string());
//!         }
//!     }
//! }
//!
//! let dispatcher = Dispatcher::builder()
//!     .base_path("/api")
//!     .post("/users", create_user)
//!     .build()
//!     .unwrap();
//!
//! let mut request = Request::builder()
//!     .method(Method::POST)
//!     .uri("/api/users")
//!     .body_json(json!({ "name": "  Ada " }))
//!     .build();
//! let mut sink = BufferedSink::new();
//!
//! assert_eq!(dispatcher.run(&mut request, &mut sink), DispatchOutcome::Handled);
//! assert_eq!(sink.status(), StatusCode::CREATED);
//! assert_eq!(sink.body(), br#"{"name":"Ada","admin":false}"#);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Request → Middleware (in registration order, scoped by path) → Route scan
//!                                                                  ↓
//!   Handled ← handler        405 ← path matched, method did not   404 ← no path matched
//! ```

#![doc(html_root_url = "https://docs.rs/wyne/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export request/response contexts
pub use wyne_core as core;

// Re-export path patterns
pub use wyne_router as router;

// Re-export middleware types
pub use wyne_middleware as middleware;

// Re-export the dispatcher
pub use wyne_server as server;

// Re-export validation
pub use wyne_validate as validate;

// Re-export configuration
pub use wyne_config as config;

// Re-export logging setup
pub use wyne_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use wyne::prelude::*;
/// ```
pub mod prelude {
    pub use http::{Method, StatusCode};

    pub use wyne_core::{
        BufferedSink, Controller, Handler, Request, RequestId, Response, ResponseSink,
    };

    pub use wyne_router::{MethodFilter, Params};

    pub use wyne_middleware::{FnMiddleware, Middleware, Next};

    pub use wyne_server::{
        DispatchOutcome, Dispatcher, DispatcherBuilder, RouteController, RouteDescriptor,
        SharedDispatcher,
    };

    pub use wyne_validate::{validate, FilterSpec, Flags, Schema, ValidationError, Validator};

    pub use wyne_config::{ConfigLoader, WyneConfig};
}
