//! Transition table for [`OrderStatus`].

use crate::model::OrderStatus;
use crate::orders::LifecycleError;
use std::fmt::Display;
use std::str::FromStr;

/// Vendor-initiated operations that move an order forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusAction {
    /// "Start Prep": `ordered → preparing`.
    StartPreparing,
    /// "Mark Ready": `ordered | preparing → ready`.
    MarkReady,
    /// Handover at the counter after the token was verified: `ready → completed`.
    CompletePickup,
}

impl StatusAction {
    pub const ALL: [StatusAction; 3] = [
        StatusAction::StartPreparing,
        StatusAction::MarkReady,
        StatusAction::CompletePickup,
    ];

    /// Status requested from the backend.
    pub fn target(&self) -> OrderStatus {
        match self {
            StatusAction::StartPreparing => OrderStatus::Preparing,
            StatusAction::MarkReady => OrderStatus::Ready,
            StatusAction::CompletePickup => OrderStatus::Completed,
        }
    }

    pub fn is_allowed_from(&self, current: OrderStatus) -> bool {
        check_transition(current, self.target()).is_ok()
    }
}

impl Display for StatusAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            StatusAction::StartPreparing => "start-prep",
            StatusAction::MarkReady => "mark-ready",
            StatusAction::CompletePickup => "complete",
        };
        f.write_str(label)
    }
}

impl FromStr for StatusAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start-prep" | "preparing" => Ok(StatusAction::StartPreparing),
            "mark-ready" | "ready" => Ok(StatusAction::MarkReady),
            "complete" | "completed" => Ok(StatusAction::CompletePickup),
            other => Err(format!("unknown action: {other}")),
        }
    }
}

/// Decides whether the client may request `target` for an order currently in `current`.
///
/// Rules:
/// - `preparing` only from `ordered`
/// - `ready` from `ordered` or `preparing` (never re-marked, never after completion)
/// - `completed` only from `ready`
/// - `ordered`, `cancelled` and `unknown` are never requested
pub fn check_transition(current: OrderStatus, target: OrderStatus) -> Result<(), LifecycleError> {
    use OrderStatus::*;

    let allowed = match target {
        Preparing => current == Ordered,
        Ready => matches!(current, Ordered | Preparing),
        Completed => current == Ready,
        Ordered | Cancelled | Unknown => return Err(LifecycleError::NotClientSettable(target)),
    };

    if allowed {
        Ok(())
    } else {
        Err(LifecycleError::InvalidTransition {
            from: current,
            to: target,
        })
    }
}

/// Actions a vendor may trigger on an order in `status`, in display order.
pub fn available_actions(status: OrderStatus) -> Vec<StatusAction> {
    StatusAction::ALL
        .into_iter()
        .filter(|action| action.is_allowed_from(status))
        .collect()
}

/// Orders still in the kitchen queue.
pub fn is_active(status: OrderStatus) -> bool {
    matches!(status, OrderStatus::Ordered | OrderStatus::Preparing)
}

/// No further client-requested transition exists.
pub fn is_terminal(status: OrderStatus) -> bool {
    matches!(status, OrderStatus::Completed | OrderStatus::Cancelled)
}
