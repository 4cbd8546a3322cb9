//! # Mock Transport & Testing Guide
//!
//! [`MockTransport`] implements [`Transport`] entirely in memory. Tests register
//! expectations (method + path + canned reply), hand the mock to the code under test
//! and afterwards inspect the recorded requests or call [`MockTransport::verify`].
//!
//! ## When to use the mock vs a live backend
//!
//! | Feature | MockTransport | Live backend |
//! |---------|---------------|--------------|
//! | **Speed** | Instant (in-memory) | Network round trips |
//! | **Determinism** | Fully deterministic (delays follow tokio's clock) | Subject to backend state |
//! | **Error injection** | `return_status(401)`, `return_err(..)` | Hard to provoke |
//! | **Use case** | Client logic, session teardown, polling | End-to-end smoke tests |
//!
//! ## Example
//!
//! ```rust
//! use canteen_transport::mock::MockTransport;
//! use canteen_transport::{ApiRequest, Transport};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockTransport::new();
//!     mock.expect_get("/menu/").return_ok(json!([]));
//!     mock.expect_get("/orders/").repeatedly().return_ok(json!([]));
//!
//!     let response = mock.send(ApiRequest::get("/menu/")).await.unwrap();
//!     assert!(response.is_success());
//!
//!     mock.send(ApiRequest::get("/orders/")).await.unwrap();
//!     mock.send(ApiRequest::get("/orders/")).await.unwrap();
//!
//!     assert_eq!(mock.request_count(), 3);
//!     mock.verify(); // the one-shot /menu/ expectation was consumed
//! }
//! ```
//!
//! ## Simulating slow responses
//!
//! `delayed(..)` sleeps on tokio's clock before replying. Combined with
//! `#[tokio::test(start_paused = true)]` this makes overlapping, out-of-order
//! responses reproducible without real waiting.
//!
//! ## Matching rules
//!
//! A request consumes the *first* registered expectation whose method and path
//! match. One-shot expectations (the default, or `times(n)`) are used up in
//! registration order; `repeatedly()` expectations never run out. A request with no
//! matching expectation panics, like an unexpected message to a mocked actor.

use crate::error::TransportError;
use crate::message::{ApiRequest, ApiResponse, Method};
use crate::transport::Transport;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

struct Expectation {
    method: Method,
    path: String,
    response: Result<ApiResponse, TransportError>,
    delay: Option<Duration>,
    /// `None` = unlimited.
    remaining: Option<usize>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory [`Transport`] with fluent expectations and a request log.
///
/// Cloning shares the same expectations and log, so a test can keep one handle
/// while the code under test owns another.
#[derive(Clone, Default)]
pub struct MockTransport {
    expectations: Arc<Mutex<Vec<Expectation>>>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect(&self, method: Method, path: impl Into<String>) -> ExpectationBuilder {
        ExpectationBuilder {
            method,
            path: path.into(),
            delay: None,
            remaining: Some(1),
            expectations: self.expectations.clone(),
        }
    }

    pub fn expect_get(&self, path: impl Into<String>) -> ExpectationBuilder {
        self.expect(Method::Get, path)
    }

    pub fn expect_post(&self, path: impl Into<String>) -> ExpectationBuilder {
        self.expect(Method::Post, path)
    }

    pub fn expect_put(&self, path: impl Into<String>) -> ExpectationBuilder {
        self.expect(Method::Put, path)
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        lock(&self.requests).clone()
    }

    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Number of received requests with this method and path.
    pub fn count(&self, method: Method, path: &str) -> usize {
        lock(&self.requests)
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        lock(&self.requests).last().cloned()
    }

    /// Panics if a one-shot expectation was never consumed.
    pub fn verify(&self) {
        let exps = lock(&self.expectations);
        let pending: Vec<String> = exps
            .iter()
            .filter(|e| e.remaining.is_some())
            .map(|e| format!("{} {}", e.method, e.path))
            .collect();
        if !pending.is_empty() {
            panic!(
                "Not all expectations were met. {} remaining: {:?}",
                pending.len(),
                pending
            );
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let label = request.label();
        let (method, path) = (request.method, request.path.clone());
        lock(&self.requests).push(request);

        let matched = {
            let mut exps = lock(&self.expectations);
            let position = exps
                .iter()
                .position(|e| e.method == method && e.path == path);
            position.map(|index| {
                let expectation = &mut exps[index];
                let reply = (expectation.response.clone(), expectation.delay);
                if let Some(remaining) = expectation.remaining.as_mut() {
                    *remaining -= 1;
                    if *remaining == 0 {
                        exps.remove(index);
                    }
                }
                reply
            })
        };

        let Some((response, delay)) = matched else {
            panic!("Unexpected request: {label}");
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        response
    }
}

/// Builder returned by [`MockTransport::expect`].
pub struct ExpectationBuilder {
    method: Method,
    path: String,
    delay: Option<Duration>,
    remaining: Option<usize>,
    expectations: Arc<Mutex<Vec<Expectation>>>,
}

impl ExpectationBuilder {
    /// Match this many requests instead of one.
    pub fn times(mut self, count: usize) -> Self {
        self.remaining = Some(count.max(1));
        self
    }

    /// Match any number of requests; ignored by [`MockTransport::verify`].
    pub fn repeatedly(mut self) -> Self {
        self.remaining = None;
        self
    }

    /// Sleep on tokio's clock before replying.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Replies `200 OK` with `body`.
    pub fn return_ok(self, body: Value) {
        self.push(Ok(ApiResponse::ok(body)));
    }

    pub fn return_json(self, status: u16, body: Value) {
        self.push(Ok(ApiResponse::new(status, body)));
    }

    /// Replies with `status` and an empty body.
    pub fn return_status(self, status: u16) {
        self.push(Ok(ApiResponse::new(status, Value::Null)));
    }

    /// Fails at the transport level (no response at all).
    pub fn return_err(self, error: TransportError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<ApiResponse, TransportError>) {
        lock(&self.expectations).push(Expectation {
            method: self.method,
            path: self.path,
            response,
            delay: self.delay,
            remaining: self.remaining,
        });
    }
}
