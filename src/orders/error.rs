//! Error types for the order lifecycle.

use crate::model::OrderStatus;
use thiserror::Error;

/// A status change the client refuses to request.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum LifecycleError {
    /// The order's current status does not allow the requested move.
    #[error("Cannot move order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// The target status is set by the backend, never requested by the client.
    #[error("Status {0} cannot be requested by the client")]
    NotClientSettable(OrderStatus),
}
