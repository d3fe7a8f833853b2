//! Test request building.

use bytes::Bytes;
use http::{header, HeaderMap, HeaderName, HeaderValue, Method, Uri};
use serde::Serialize;
use wyne_core::{Request, RequestId, REQUEST_ID_HEADER};

use crate::error::TestError;

/// A fully built request, ready to be dispatched.
#[derive(Debug, Clone)]
pub struct TestRequest {
    /// HTTP method
    pub method: Method,
    /// Request URI
    pub uri: Uri,
    /// Request headers
    pub headers: HeaderMap,
    /// Raw request body
    pub body: Bytes,
}

impl TestRequest {
    /// Starts a GET request.
    pub fn get(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::GET, uri)
    }

    /// Starts a POST request.
    pub fn post(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::POST, uri)
    }

    /// Starts a PUT request.
    pub fn put(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::PUT, uri)
    }

    /// Starts a PATCH request.
    pub fn patch(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::PATCH, uri)
    }

    /// Starts a DELETE request.
    pub fn delete(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::DELETE, uri)
    }

    /// Converts this request into a transport-level request.
    #[must_use]
    pub fn into_http_request(self) -> http::Request<Bytes> {
        let mut request = http::Request::new(self.body);
        *request.method_mut() = self.method;
        *request.uri_mut() = self.uri;
        *request.headers_mut() = self.headers;
        request
    }

    /// Converts this request into a dispatchable request context.
    ///
    /// The path is normalized and the query and body are decoded exactly as a
    /// transport would do it.
    #[must_use]
    pub fn into_request(self) -> Request {
        Request::from_http(self.into_http_request())
    }
}

/// Builder for [`TestRequest`].
///
/// Invalid header names, values and unserializable bodies do not panic while
/// chaining; the first such error is returned by [`build`](Self::build).
#[must_use]
#[derive(Debug)]
pub struct TestRequestBuilder {
    method: Method,
    uri: String,
    headers: HeaderMap,
    body: Option<Bytes>,
    error: Option<TestError>,
}

impl TestRequestBuilder {
    /// Creates a request builder.
    pub fn new(method: Method, uri: impl AsRef<str>) -> Self {
        Self {
            method,
            uri: uri.as_ref().to_string(),
            headers: HeaderMap::new(),
            body: None,
            error: None,
        }
    }

    /// Sets a header, replacing any previous value.
    ///
    /// # Example
    ///
    /// ```
    /// use wyne_test::TestRequest;
    ///
    /// let request = TestRequest::get("/users")
    ///     .header("Accept", "application/json")
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(request.headers["accept"], "application/json");
    /// ```
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        let name = name.as_ref();
        let parsed = HeaderName::try_from(name)
            .map_err(|e| TestError::invalid_header(name, e))
            .and_then(|n| {
                HeaderValue::try_from(value.as_ref())
                    .map(|v| (n, v))
                    .map_err(|e| TestError::invalid_header(name, e))
            });
        match parsed {
            Ok((name, value)) => {
                self.headers.insert(name, value);
            }
            Err(err) => self.fail(err),
        }
        self
    }

    /// Sets the `Content-Type` header.
    pub fn content_type(self, content_type: impl AsRef<str>) -> Self {
        self.header(header::CONTENT_TYPE.as_str(), content_type)
    }

    /// Sets the `x-request-id` header, which the request context adopts.
    pub fn request_id(self, id: RequestId) -> Self {
        self.header(REQUEST_ID_HEADER, id.to_string())
    }

    /// Appends URL-encoded query parameters to the URI.
    pub fn query<T: Serialize + ?Sized>(mut self, params: &T) -> Self {
        match serde_urlencoded::to_string(params) {
            Ok(encoded) if encoded.is_empty() => {}
            Ok(encoded) => {
                let separator = if self.uri.contains('?') { '&' } else { '?' };
                self.uri.push(separator);
                self.uri.push_str(&encoded);
            }
            Err(err) => self.fail(err.into()),
        }
        self
    }

    /// Sets the raw request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets a JSON body and `Content-Type: application/json`.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(bytes) => {
                self.body = Some(Bytes::from(bytes));
                self.content_type("application/json")
            }
            Err(err) => {
                self.fail(err.into());
                self
            }
        }
    }

    /// Sets a form body and `Content-Type: application/x-www-form-urlencoded`.
    pub fn form<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        match serde_urlencoded::to_string(value) {
            Ok(encoded) => {
                self.body = Some(Bytes::from(encoded));
                self.content_type("application/x-www-form-urlencoded")
            }
            Err(err) => {
                self.fail(err.into());
                self
            }
        }
    }

    /// Builds the request.
    ///
    /// # Errors
    ///
    /// Returns the first error recorded while chaining, or
    /// [`TestError::InvalidUri`] if the URI does not parse.
    pub fn build(self) -> Result<TestRequest, TestError> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let uri: Uri = self
            .uri
            .parse()
            .map_err(|e| TestError::invalid_uri(&self.uri, e))?;

        Ok(TestRequest {
            method: self.method,
            uri,
            headers: self.headers,
            body: self.body.unwrap_or_default(),
        })
    }

    fn fail(&mut self, err: TestError) {
        self.error.get_or_insert(err);
    }
}
