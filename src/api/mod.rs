//! # Backend API
//!
//! [`ApiClient`] wraps every backend endpoint behind a typed async method.
//!
//! Each call attaches the bearer token of the current session, sends the request
//! through the [`Transport`](canteen_transport::Transport) seam and translates the
//! reply:
//!
//! | Reply            | Result                                              |
//! |------------------|-----------------------------------------------------|
//! | 2xx              | body decoded into the endpoint's type               |
//! | 401              | session torn down, [`ApiError::Unauthorized`]       |
//! | 404              | [`ApiError::NotFound`]                              |
//! | other            | [`ApiError::Rejected`] with the backend `detail`    |
//! | transport failure| [`ApiError::Network`]                               |

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
