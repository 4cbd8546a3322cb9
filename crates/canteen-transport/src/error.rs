//! # Transport Errors
//!
//! Failures that happen *below* HTTP semantics: the request never produced a
//! response we could read. Status codes (401, 404, 422, ...) are not errors at
//! this layer; they travel back inside [`ApiResponse`](crate::ApiResponse) and are
//! classified by the domain client.

/// Errors raised while moving a request to the backend and reading its reply.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    #[error("Backend unreachable: {0}")]
    Connect(String),
    #[error("Request timed out")]
    Timeout,
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Unreadable response body: {0}")]
    Body(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else if e.is_builder() {
            TransportError::InvalidRequest(e.to_string())
        } else if e.is_body() || e.is_decode() {
            TransportError::Body(e.to_string())
        } else {
            TransportError::Connect(e.to_string())
        }
    }
}
