//! Captured dispatch results.

use std::fmt;

use bytes::Bytes;
use http::{header, HeaderMap, HeaderValue, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use wyne_core::{BufferedSink, RequestId};
use wyne_server::DispatchOutcome;

use crate::error::TestError;

/// Everything one request cycle produced: the buffered response plus how
/// dispatch ended.
pub struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    outcome: DispatchOutcome,
    request_id: RequestId,
}

impl TestResponse {
    /// Captures the contents of a sink after dispatch.
    #[must_use]
    pub fn from_sink(sink: BufferedSink, outcome: DispatchOutcome, request_id: RequestId) -> Self {
        let (parts, body) = sink.into_response().into_parts();
        Self {
            status: parts.status,
            headers: parts.headers,
            body,
            outcome,
            request_id,
        }
    }

    /// Returns the status code.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the status code as a u16.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Returns true if the status is 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns true if the status is 4xx.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status.is_client_error()
    }

    /// Returns how dispatch ended.
    #[must_use]
    pub const fn outcome(&self) -> DispatchOutcome {
        self.outcome
    }

    /// Returns the ID of the dispatched request.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns the headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Gets a header value by name.
    #[must_use]
    pub fn header(&self, name: impl AsRef<str>) -> Option<&HeaderValue> {
        self.headers.get(name.as_ref())
    }

    /// Gets a header value as a string.
    #[must_use]
    pub fn header_str(&self, name: impl AsRef<str>) -> Option<&str> {
        self.header(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the `Content-Type` header.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header_str(header::CONTENT_TYPE.as_str())
    }

    /// Returns the raw body.
    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the body as a string.
    pub fn text(&self) -> Result<String, TestError> {
        Ok(String::from_utf8(self.body.to_vec())?)
    }

    /// Deserializes the body as JSON.
    ///
    /// # Example
    ///
    /// ```
    /// use wyne_core::{Request, Response};
    /// use wyne_server::Dispatcher;
    /// use wyne_test::TestClient;
    ///
    /// let dispatcher = Dispatcher::builder()
    ///     .get(r"/users/(\d+)", |req: &Request, res: &mut Response<'_>| {
    ///         let _ = res.json(&serde_json::json!({ "id": req.param(0) }));
    ///     })
    ///     .build()
    ///     .unwrap();
    ///
    /// let response = TestClient::new(dispatcher).get("/users/7").send();
    /// let body: serde_json::Value = response.json().unwrap();
    /// assert_eq!(body["id"], "7");
    /// ```
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TestError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Asserts the status code.
    ///
    /// # Panics
    ///
    /// Panics if the status differs.
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status, expected,
            "Expected status {}, got {}",
            expected, self.status
        );
        self
    }

    /// Asserts how dispatch ended.
    ///
    /// # Panics
    ///
    /// Panics if the outcome differs.
    pub fn assert_outcome(&self, expected: DispatchOutcome) -> &Self {
        assert_eq!(
            self.outcome, expected,
            "Expected outcome {:?}, got {:?}",
            expected, self.outcome
        );
        self
    }

    /// Asserts a header value.
    ///
    /// # Panics
    ///
    /// Panics if the header is missing or differs.
    pub fn assert_header(&self, name: impl AsRef<str>, expected: impl AsRef<str>) -> &Self {
        let name = name.as_ref();
        let expected = expected.as_ref();
        let actual = self
            .header_str(name)
            .unwrap_or_else(|| panic!("Header '{}' not found", name));
        assert_eq!(actual, expected, "Header '{}' mismatch", name);
        self
    }

    /// Asserts the body text.
    ///
    /// # Panics
    ///
    /// Panics if the body is not UTF-8 or differs.
    pub fn assert_body(&self, expected: impl AsRef<str>) -> &Self {
        let body = self.text().expect("body should be valid UTF-8");
        assert_eq!(body, expected.as_ref(), "Body mismatch");
        self
    }

    /// Asserts the whole JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the body is not JSON or differs.
    pub fn assert_json(&self, expected: &Value) -> &Self {
        let actual: Value = self.json().expect("body should be valid JSON");
        assert_eq!(&actual, expected, "JSON body mismatch");
        self
    }

    /// Asserts one JSON value addressed by a dotted path such as
    /// `user.tags.0`.
    ///
    /// # Panics
    ///
    /// Panics if the body is not JSON, the path is missing, or the value
    /// differs.
    pub fn assert_json_field(&self, path: &str, expected: &Value) -> &Self {
        let json: Value = self.json().expect("body should be valid JSON");
        let actual = lookup(&json, path)
            .unwrap_or_else(|| panic!("JSON path '{}' not found in {}", path, json));
        assert_eq!(actual, expected, "JSON field '{}' mismatch", path);
        self
    }
}

impl fmt::Debug for TestResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestResponse")
            .field("status", &self.status)
            .field("outcome", &self.outcome)
            .field("headers", &self.headers)
            .field("body_len", &self.body.len())
            .finish_non_exhaustive()
    }
}

fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .filter(|segment| !segment.is_empty())
        .try_fold(value, |current, segment| match current {
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            Value::Object(map) => map.get(segment),
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wyne_core::Response;

    fn captured(status: StatusCode, body: &Value) -> TestResponse {
        let mut sink = BufferedSink::new();
        let mut res = Response::new(&mut sink);
        res.status(status);
        res.json(body).unwrap();
        TestResponse::from_sink(sink, DispatchOutcome::Handled, RequestId::new())
    }

    #[test]
    fn test_captures_sink() {
        let response = captured(StatusCode::CREATED, &json!({"id": 1}));
        assert_eq!(response.status_code(), 201);
        assert!(response.is_success());
        assert_eq!(response.content_type(), Some("application/json"));
        assert_eq!(response.text().unwrap(), "{\"id\":1}");
        assert!(response.outcome().is_handled());
    }

    #[test]
    fn test_status_message_is_body() {
        let mut sink = BufferedSink::new();
        Response::new(&mut sink).status_with_message(StatusCode::BAD_REQUEST, "Bad Input");
        let response = TestResponse::from_sink(sink, DispatchOutcome::Handled, RequestId::new());
        response
            .assert_status(StatusCode::BAD_REQUEST)
            .assert_body("Bad Input");
        assert!(response.is_client_error());
    }

    #[test]
    fn test_json_assertions() {
        let response = captured(
            StatusCode::OK,
            &json!({"user": {"name": "Alice", "tags": ["admin", "ops"]}}),
        );
        response
            .assert_json_field("user.name", &json!("Alice"))
            .assert_json_field("user.tags.1", &json!("ops"))
            .assert_header("content-type", "application/json");
    }

    #[test]
    fn test_lookup() {
        let value = json!({"a": [{"b": 1}]});
        assert_eq!(lookup(&value, "a.0.b"), Some(&json!(1)));
        assert_eq!(lookup(&value, "a.x"), None);
        assert_eq!(lookup(&value, "missing"), None);
        assert_eq!(lookup(&value, ""), Some(&value));
    }

    #[test]
    #[should_panic(expected = "Expected status 404 Not Found, got 200 OK")]
    fn test_assert_status_panics() {
        captured(StatusCode::OK, &json!({})).assert_status(StatusCode::NOT_FOUND);
    }
}
