//! # Order Lifecycle
//!
//! The client-side half of the order status state machine.
//!
//! ```text
//! ordered ──StartPreparing──▶ preparing ──MarkReady──▶ ready ──CompletePickup──▶ completed
//!    └──────────────MarkReady──────────────────▲
//! ```
//!
//! `cancelled` exists on the backend but is never requested from here. The backend
//! stays the authority; these checks only stop the client from *sending* a request
//! that walks an order backwards or out of a terminal state.
//!
//! ## Structure
//!
//! - [`lifecycle`] - [`StatusAction`] and the transition table
//! - [`error`] - [`LifecycleError`]

pub mod error;
pub mod lifecycle;

pub use error::*;
pub use lifecycle::*;
