//! # Wyne Core
//!
//! Core types and traits for the Wyne dispatch toolkit.
//!
//! This crate provides the per-request types shared by every other crate:
//!
//! - [`Request`] - Request context: method, normalized path, query, body, route parameters, extensions
//! - [`RequestId`] - UUID v7 request identifier
//! - [`Response`] - Response context over a [`ResponseSink`], with a "headers sent" guard
//! - [`BufferedSink`] - In-memory sink that converts to an `http::Response`
//! - [`Handler`] / [`Controller`] - Route targets

#![doc(html_root_url = "https://docs.rs/wyne-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod body;
mod extensions;
mod handler;
mod request;
mod response;

pub use extensions::Extensions;
pub use handler::{BoxHandler, Controller, ControllerHandler, Handler};
pub use request::{Request, RequestBuilder, RequestId, REQUEST_ID_HEADER};
pub use response::{BufferedSink, Response, ResponseSink};
pub use wyne_router::Params;
