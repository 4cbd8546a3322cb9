//! # Transport Trait
//!
//! The single seam between domain code and the network. Domain clients hold an
//! `Arc<dyn Transport>` and never touch `reqwest` directly, so the same client
//! logic runs against [`HttpTransport`](crate::HttpTransport) in production and
//! [`MockTransport`](crate::mock::MockTransport) in tests.

use crate::error::TransportError;
use crate::message::{ApiRequest, ApiResponse};
use async_trait::async_trait;
use std::sync::Arc;

/// Sends one request and returns the backend's reply.
///
/// # Example
///
/// ```rust
/// use canteen_transport::{ApiRequest, ApiResponse, Transport, TransportError};
/// use async_trait::async_trait;
///
/// struct Echo;
///
/// #[async_trait]
/// impl Transport for Echo {
///     async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
///         Ok(ApiResponse::ok(serde_json::json!({ "path": request.path })))
///     }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let response = Echo.send(ApiRequest::get("/menu/")).await.unwrap();
///     assert_eq!(response.body["path"], "/menu/");
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        (**self).send(request).await
    }
}
