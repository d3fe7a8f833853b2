//! In-memory test client.

use std::sync::Arc;

use http::Method;
use serde::Serialize;
use wyne_core::BufferedSink;
use wyne_server::{Dispatcher, SharedDispatcher};

use crate::error::TestError;
use crate::request::{TestRequest, TestRequestBuilder};
use crate::response::TestResponse;

/// Runs requests through a [`Dispatcher`] without a transport.
///
/// Each request is converted with `Request::from_http`, dispatched into a
/// [`BufferedSink`], and captured as a [`TestResponse`] together with the
/// [`DispatchOutcome`](wyne_server::DispatchOutcome).
///
/// # Example
///
/// ```
/// use http::StatusCode;
/// use wyne_core::{Request, Response};
/// use wyne_server::{DispatchOutcome, Dispatcher};
/// use wyne_test::TestClient;
///
/// let dispatcher = Dispatcher::builder()
///     .get("/health", |_req: &Request, res: &mut Response<'_>| res.send("ok"))
///     .build()
///     .unwrap();
/// let client = TestClient::new(dispatcher);
///
/// client.get("/health").send().assert_status(StatusCode::OK).assert_body("ok");
/// client
///     .post("/health")
///     .send()
///     .assert_outcome(DispatchOutcome::MethodNotAllowed);
/// ```
#[must_use]
#[derive(Debug, Clone)]
pub struct TestClient {
    dispatcher: Arc<Dispatcher>,
    default_headers: Vec<(String, String)>,
}

impl TestClient {
    /// Creates a client for a dispatcher.
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self::from_arc(Arc::new(dispatcher))
    }

    /// Creates a client for a shared dispatcher.
    pub fn from_arc(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            default_headers: Vec::new(),
        }
    }

    /// Creates a client for the current snapshot of a [`SharedDispatcher`].
    ///
    /// Later updates to the shared dispatcher are not seen by this client.
    pub fn snapshot(shared: &SharedDispatcher) -> Self {
        Self::from_arc(shared.snapshot())
    }

    /// Adds a header sent with every request.
    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Returns the dispatcher under test.
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Starts a GET request.
    pub fn get(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::GET, uri)
    }

    /// Starts a POST request.
    pub fn post(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::POST, uri)
    }

    /// Starts a PUT request.
    pub fn put(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::PUT, uri)
    }

    /// Starts a PATCH request.
    pub fn patch(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::PATCH, uri)
    }

    /// Starts a DELETE request.
    pub fn delete(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::DELETE, uri)
    }

    /// Starts a request with any method.
    pub fn request(&self, method: Method, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        let builder = self
            .default_headers
            .iter()
            .fold(TestRequestBuilder::new(method, uri), |builder, (name, value)| {
                builder.header(name, value)
            });
        TestClientRequest {
            client: self,
            builder,
        }
    }

    /// Dispatches a built request.
    pub fn execute(&self, request: TestRequest) -> TestResponse {
        let mut request = request.into_request();
        let mut sink = BufferedSink::new();
        let outcome = self.dispatcher.run(&mut request, &mut sink);
        TestResponse::from_sink(sink, outcome, request.request_id())
    }
}

/// A request builder bound to a [`TestClient`].
#[must_use]
#[derive(Debug)]
pub struct TestClientRequest<'a> {
    client: &'a TestClient,
    builder: TestRequestBuilder,
}

impl TestClientRequest<'_> {
    /// Sets a header.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.builder = self.builder.header(name, value);
        self
    }

    /// Appends URL-encoded query parameters.
    pub fn query<T: Serialize + ?Sized>(mut self, params: &T) -> Self {
        self.builder = self.builder.query(params);
        self
    }

    /// Sets a JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        self.builder = self.builder.json(value);
        self
    }

    /// Sets a form body.
    pub fn form<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        self.builder = self.builder.form(value);
        self
    }

    /// Sets a raw body.
    pub fn body(mut self, body: impl Into<bytes::Bytes>) -> Self {
        self.builder = self.builder.body(body);
        self
    }

    /// Dispatches the request.
    ///
    /// # Panics
    ///
    /// Panics if the request could not be built; use
    /// [`try_send`](Self::try_send) to handle that case.
    pub fn send(self) -> TestResponse {
        self.try_send().expect("test request should be valid")
    }

    /// Dispatches the request, returning build errors.
    pub fn try_send(self) -> Result<TestResponse, TestError> {
        let request = self.builder.build()?;
        Ok(self.client.execute(request))
    }
}
