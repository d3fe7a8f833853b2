//! # Wyne Middleware
//!
//! Middleware chain for the Wyne dispatcher.
//!
//! Middleware run before route dispatch, in registration order. Each one
//! receives the request, the response and a [`Next`] signal:
//!
//! ```text
//! entry 1 (global)      ──► mw A ──proceed──► mw B ──proceed──┐
//! entry 2 (/admin.*)    ──► skipped unless the path matches   │
//! entry 3 (global)      ◄─────────────────────────────────────┘
//!                           mw C ── returns without proceed ──► dispatch stops
//! ```
//!
//! A scoped entry is matched with the same anchored, base-path aware
//! patterns as routes, and commits its captures to the request parameters
//! when it applies.

#![doc(html_root_url = "https://docs.rs/wyne-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod chain;
pub mod middleware;

pub use chain::{BoxMiddleware, ChainOutcome, MiddlewareChain, MiddlewareEntry};
pub use middleware::{FnMiddleware, Middleware, Next};
