//! Response primitives.
//!
//! A [`Response`] wraps a transport-level [`ResponseSink`] and tracks one
//! piece of state: whether headers have been sent. Once they have, further
//! status changes are ignored. Header writes and body output are not guarded.

use bytes::{Bytes, BytesMut};
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use serde::Serialize;
use tracing::warn;

/// Destination of response output.
///
/// Implemented by transports. [`BufferedSink`] collects everything in memory.
pub trait ResponseSink {
    /// Sets the status code.
    fn set_status(&mut self, status: StatusCode);

    /// Sets a header, replacing any previous value with the same name.
    fn insert_header(&mut self, name: HeaderName, value: HeaderValue);

    /// Appends body output.
    fn write(&mut self, chunk: &[u8]);
}

/// Response context handed to middleware, handlers and hooks.
///
/// # Example
///
/// ```
/// use http::StatusCode;
/// use wyne_core::{BufferedSink, Response};
///
/// let mut sink = BufferedSink::new();
/// let mut res = Response::new(&mut sink);
///
/// res.status(StatusCode::CREATED);
/// res.send("done");
/// res.status(StatusCode::BAD_REQUEST); // ignored, headers already sent
///
/// assert_eq!(sink.status(), StatusCode::CREATED);
/// assert_eq!(sink.body(), b"done");
/// ```
pub struct Response<'a> {
    sink: &'a mut dyn ResponseSink,
    headers_sent: bool,
}

impl<'a> Response<'a> {
    /// Wraps a sink.
    pub fn new(sink: &'a mut dyn ResponseSink) -> Self {
        Self {
            sink,
            headers_sent: false,
        }
    }

    /// Returns true once output has been sent.
    #[must_use]
    pub const fn headers_sent(&self) -> bool {
        self.headers_sent
    }

    /// Sets the status code. No-op once headers have been sent.
    pub fn status(&mut self, status: StatusCode) -> &mut Self {
        if !self.headers_sent {
            self.sink.set_status(status);
        }
        self
    }

    /// Sets the status code and sends `message` as the body, which commits
    /// the status. No-op once headers have been sent.
    pub fn status_with_message(&mut self, status: StatusCode, message: &str) {
        if !self.headers_sent {
            self.sink.set_status(status);
            self.send(message);
        }
    }

    /// Sets a header. Invalid names or values are logged and skipped.
    pub fn set_header(&mut self, name: &str, value: &str) -> &mut Self {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => self.sink.insert_header(name, value),
            _ => warn!(header = name, "invalid response header skipped"),
        }
        self
    }

    /// Sets several headers in order.
    pub fn set_headers<I, K, V>(&mut self, headers: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (name, value) in headers {
            self.set_header(name.as_ref(), value.as_ref());
        }
        self
    }

    /// Writes body output and marks headers as sent.
    pub fn send(&mut self, body: impl AsRef<[u8]>) {
        self.headers_sent = true;
        self.sink.write(body.as_ref());
    }

    /// Serializes `value` as JSON, sets `Content-Type` and `Content-Length`,
    /// and sends it.
    pub fn json<T: Serialize + ?Sized>(&mut self, value: &T) -> serde_json::Result<()> {
        let body = serde_json::to_vec(value)?;
        self.sink.insert_header(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        self.sink.insert_header(CONTENT_LENGTH, HeaderValue::from(body.len()));
        self.send(body);
        Ok(())
    }
}

impl std::fmt::Debug for Response<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Response")
            .field("headers_sent", &self.headers_sent)
            .finish_non_exhaustive()
    }
}

/// A sink that buffers the whole response in memory.
#[derive(Debug, Clone, Default)]
pub struct BufferedSink {
    status: StatusCode,
    headers: HeaderMap,
    body: BytesMut,
}

impl BufferedSink {
    /// Creates an empty sink with status `200 OK`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the status code.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the body written so far.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Converts the buffered output into an HTTP response.
    #[must_use]
    pub fn into_response(self) -> http::Response<Bytes> {
        let mut response = http::Response::new(self.body.freeze());
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

impl ResponseSink for BufferedSink {
    fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    fn insert_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    fn write(&mut self, chunk: &[u8]) {
        self.body.extend_from_slice(chunk);
    }
}
