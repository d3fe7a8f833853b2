//! # Wyne Test
//!
//! In-memory testing utilities for Wyne dispatchers.
//!
//! Requests never touch a socket: [`TestClient`] converts each
//! [`TestRequest`] into a request context, runs it through the dispatcher
//! into a buffered sink, and hands back a [`TestResponse`].
//!
//! ## Features
//!
//! - Build requests with headers, query parameters and JSON, form or raw bodies
//! - Inspect status, headers, body and the dispatch outcome
//! - Chainable assertions, including dotted JSON paths
//!
//! ## Example
//!
//! ```rust
//! use http::StatusCode;
//! use serde_json::json;
//! use wyne_core::{Request, Response};
//! use wyne_server::Dispatcher;
//! use wyne_test::TestClient;
//!
//! let dispatcher = Dispatcher::builder()
//!     .post("/users", |req: &Request, res: &mut Response<'_>| {
//!         res.status(StatusCode::CREATED);
//!         let _ = res.json(req.body());
//!     })
//!     .build()
//!     .unwrap();
//!
//! TestClient::new(dispatcher)
//!     .post("/users")
//!     .json(&json!({ "name": "Alice" }))
//!     .send()
//!     .assert_status(StatusCode::CREATED)
//!     .assert_json_field("name", &json!("Alice"));
//! ```

#![doc(html_root_url = "https://docs.rs/wyne-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod request;
mod response;

pub use client::{TestClient, TestClientRequest};
pub use error::TestError;
pub use request::{TestRequest, TestRequestBuilder};
pub use response::TestResponse;
