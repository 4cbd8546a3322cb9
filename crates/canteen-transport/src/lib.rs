//! # Canteen Transport
//!
//! Request/response plumbing shared by every canteen client.
//!
//! ## Architecture Overview
//!
//! The crate separates *what* is sent from *how* it is sent:
//!
//! 1. **Message Layer** ([`ApiRequest`], [`ApiResponse`]) - plain values describing a call
//! 2. **Seam** ([`Transport`]) - one async method, `send`
//! 3. **Implementations** - [`HttpTransport`] (reqwest) and [`mock::MockTransport`] (in-memory)
//!
//! Domain clients build `ApiRequest`s, pass them through an `Arc<dyn Transport>` and
//! interpret the status code themselves. HTTP error statuses are *responses*, not
//! [`TransportError`]s; only failures to reach the backend or read its reply are.
//!
//! ## Testing
//!
//! [`mock::MockTransport`] answers from a list of expectations and records every
//! request, so client logic (auth headers, 401 handling, polling cadence) can be
//! tested deterministically. See the [`mock`] module for the full guide.

pub mod error;
pub mod http;
pub mod message;
pub mod mock;
pub mod tracing;
pub mod transport;

pub use error::TransportError;
pub use http::HttpTransport;
pub use message::{ApiRequest, ApiResponse, Method, RequestBody, GENERIC_FAILURE};
pub use transport::Transport;
