//! Messages understood by the [`OrderBoard`](crate::board::OrderBoard).

use crate::board::BoardSnapshot;
use crate::model::Order;
use tokio::sync::oneshot;

pub type Response<T> = oneshot::Sender<T>;

/// What happened to a submitted refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceOutcome {
    /// The list was replaced; `generation` is now the newest applied.
    Applied { generation: u64 },
    /// A newer generation was already applied; the list was left untouched.
    Stale { generation: u64, latest: u64 },
}

impl ReplaceOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ReplaceOutcome::Applied { .. })
    }
}

#[derive(Debug)]
pub enum BoardRequest {
    /// Full read-replace of the order list, tagged with the generation issued
    /// before the fetch was sent.
    Replace {
        generation: u64,
        orders: Vec<Order>,
        respond_to: Response<ReplaceOutcome>,
    },
    Snapshot {
        respond_to: Response<BoardSnapshot>,
    },
    /// Empties the board and marks every generation up to `generation` as stale.
    Clear {
        generation: u64,
        respond_to: Response<()>,
    },
}
