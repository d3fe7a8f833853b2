//! Request context types.
//!
//! The [`Request`] carries all per-request state through the middleware
//! chain and into the route handler.

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;
use wyne_router::{normalize_path, Params};

use crate::body::{decode_body, decode_query};
use crate::extensions::Extensions;

/// Header that carries a caller-supplied request ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// A unique identifier for each request, using UUID v7.
///
/// UUID v7 is time-ordered, which keeps log lines of one request easy to
/// correlate and sort.
///
/// # Example
///
/// ```
/// use wyne_core::RequestId;
///
/// let id = RequestId::new();
/// let parsed: RequestId = id.to_string().parse().unwrap();
/// assert_eq!(id, parsed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new request ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for RequestId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl From<Uuid> for RequestId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Per-request context.
///
/// Created once per request. Route parameters are written by the dispatcher,
/// the extension slot by middleware; handlers see the request read-only.
///
/// # Example
///
/// ```
/// use bytes::Bytes;
/// use wyne_core::Request;
///
/// let http = http::Request::post("/users/?page=2")
///     .header("content-type", "application/json")
///     .body(Bytes::from_static(br#"{"name":"Bob"}"#))
///     .unwrap();
///
/// let request = Request::from_http(http);
/// assert_eq!(request.path(), "/users");
/// assert_eq!(request.query_param("page"), Some("2"));
/// assert_eq!(request.body()["name"], "Bob");
/// ```
#[derive(Debug)]
pub struct Request {
    request_id: RequestId,
    method: Method,
    path: String,
    query: Map<String, Value>,
    headers: HeaderMap,
    body: Map<String, Value>,
    raw_body: Bytes,
    params: Params,
    extensions: Extensions,
}

impl Request {
    /// Returns a builder for constructing a request directly.
    #[must_use]
    pub fn builder() -> RequestBuilder {
        RequestBuilder::new()
    }

    /// Creates a request context from a transport-level request.
    ///
    /// The path is normalized, the query string and body are decoded, and a
    /// valid `x-request-id` header is adopted as the request ID.
    #[must_use]
    pub fn from_http(request: http::Request<Bytes>) -> Self {
        let (parts, raw_body) = request.into_parts();

        let request_id = parts
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();

        Self {
            request_id,
            path: normalize_path(parts.uri.path()).to_string(),
            query: decode_query(parts.uri.query()),
            body: decode_body(&parts.headers, &raw_body),
            method: parts.method,
            headers: parts.headers,
            raw_body,
            params: Params::new(),
            extensions: Extensions::new(),
        }
    }

    /// Returns the request ID.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the normalized request path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the decoded query parameters.
    #[must_use]
    pub const fn query(&self) -> &Map<String, Value> {
        &self.query
    }

    /// Returns a query parameter as a string.
    #[must_use]
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query.get(key).and_then(Value::as_str)
    }

    /// Returns the request headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a header value as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the decoded body mapping.
    #[must_use]
    pub const fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    /// Returns the undecoded body bytes.
    #[must_use]
    pub const fn raw_body(&self) -> &Bytes {
        &self.raw_body
    }

    /// Returns the route parameters.
    #[must_use]
    pub const fn params(&self) -> &Params {
        &self.params
    }

    /// Returns the route parameter at `index`.
    #[must_use]
    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index)
    }

    /// Replaces the route parameters.
    pub fn set_params(&mut self, params: Params) {
        self.params = params;
    }

    /// Returns the extension slot.
    #[must_use]
    pub const fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// Returns the extension slot mutably.
    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }
}

/// Builder for constructing a [`Request`] without a transport request.
///
/// # Example
///
/// ```
/// use http::Method;
/// use serde_json::json;
/// use wyne_core::Request;
///
/// let request = Request::builder()
///     .method(Method::PUT)
///     .uri("/items/7?dry_run=1")
///     .body_field("name", json!("lamp"))
///     .build();
///
/// assert_eq!(request.path(), "/items/7");
/// assert_eq!(request.query_param("dry_run"), Some("1"));
/// assert_eq!(request.body()["name"], "lamp");
/// ```
#[derive(Debug)]
pub struct RequestBuilder {
    request_id: Option<RequestId>,
    method: Method,
    path: String,
    query: Map<String, Value>,
    headers: HeaderMap,
    body: Map<String, Value>,
    raw_body: Bytes,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestBuilder {
    /// Creates a builder for `GET /`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            request_id: None,
            method: Method::GET,
            path: "/".to_string(),
            query: Map::new(),
            headers: HeaderMap::new(),
            body: Map::new(),
            raw_body: Bytes::new(),
        }
    }

    /// Sets the method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the path, and the query when `uri` contains a `?`.
    #[must_use]
    pub fn uri(mut self, uri: &str) -> Self {
        match uri.split_once('?') {
            Some((path, query)) => {
                self.path = normalize_path(path).to_string();
                self.query = decode_query(Some(query));
            }
            None => self.path = normalize_path(uri).to_string(),
        }
        self
    }

    /// Adds a query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), Value::String(value.into()));
        self
    }

    /// Adds a header.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Replaces the decoded body. Non-object values give an empty body.
    #[must_use]
    pub fn body_json(mut self, body: Value) -> Self {
        self.body = match body {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self
    }

    /// Sets one field of the decoded body.
    #[must_use]
    pub fn body_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.body.insert(key.into(), value);
        self
    }

    /// Sets the undecoded body bytes.
    #[must_use]
    pub fn raw_body(mut self, body: impl Into<Bytes>) -> Self {
        self.raw_body = body.into();
        self
    }

    /// Sets the request ID.
    #[must_use]
    pub fn request_id(mut self, id: RequestId) -> Self {
        self.request_id = Some(id);
        self
    }

    /// Builds the request.
    #[must_use]
    pub fn build(self) -> Request {
        Request {
            request_id: self.request_id.unwrap_or_default(),
            method: self.method,
            path: self.path,
            query: self.query,
            headers: self.headers,
            body: self.body,
            raw_body: self.raw_body,
            params: Params::new(),
            extensions: Extensions::new(),
        }
    }
}
