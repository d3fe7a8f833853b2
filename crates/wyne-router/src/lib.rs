//! Path patterns and method filters for Wyne.
//!
//! This crate holds the matching primitives used by the dispatcher. Routes
//! are described by regular-expression path specifiers that are always
//! anchored to the whole request path, optionally behind a configured base
//! path.
//!
//! # Features
//!
//! - **Anchored Patterns**: `/users/(\d+)` matches `/users/42` and never `/users/42/x`
//! - **Base Paths**: A required prefix that is matched but never captured
//! - **Ordered Parameters**: Captures are kept left to right, named groups are also addressable by name
//! - **Method Filters**: The nine standard verbs plus the `all` wildcard
//!
//! # Example
//!
//! ```rust
//! use wyne_router::{normalize_path, BasePath, MethodFilter, PathPattern};
//! use http::Method;
//!
//! let pattern = PathPattern::new(r"/orgs/([^/]+)/users/(?<id>\d+)").unwrap();
//! let base = BasePath::new("/api").unwrap();
//!
//! let params = pattern
//!     .captures(&base, normalize_path("/api/orgs/acme/users/123/"))
//!     .unwrap();
//! assert_eq!(params.get(0), Some("acme"));
//! assert_eq!(params.named("id"), Some("123"));
//!
//! assert!(MethodFilter::Get.matches(&Method::GET));
//! ```

#![doc(html_root_url = "https://docs.rs/wyne-router/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod method;
mod params;
mod pattern;

pub use error::{RouterError, RouterResult};
pub use method::MethodFilter;
pub use params::Params;
pub use pattern::{normalize_path, BasePath, PathPattern};
