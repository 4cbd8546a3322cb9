use crate::board::{BoardClient, BoardRequest, BoardSnapshot, ReplaceOutcome};
use crate::model::{Order, OrderStatus, TokenNumber, VendorId};
use std::cmp::Reverse;
use std::collections::HashSet;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

/// Single owner of the locally displayed order list.
///
/// Refreshes may complete in any order; the board applies a refresh only when its
/// generation is newer than the last applied one. Messages are processed one at a
/// time, so the list needs no lock.
pub struct OrderBoard {
    receiver: mpsc::Receiver<BoardRequest>,
    orders: Vec<Order>,
    applied: u64,
    updates: watch::Sender<u64>,
}

impl OrderBoard {
    pub fn new(buffer_size: usize) -> (Self, BoardClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (updates, updates_rx) = watch::channel(0);
        let board = Self {
            receiver,
            orders: Vec::new(),
            applied: 0,
            updates,
        };
        (board, BoardClient::new(sender, updates_rx))
    }

    /// Processes messages until every [`BoardClient`] is dropped.
    pub async fn run(mut self) {
        info!("Order board started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                BoardRequest::Replace {
                    generation,
                    orders,
                    respond_to,
                } => {
                    let outcome = self.replace(generation, orders);
                    let _ = respond_to.send(outcome);
                }
                BoardRequest::Snapshot { respond_to } => {
                    let _ = respond_to.send(BoardSnapshot {
                        generation: self.applied,
                        orders: self.orders.clone(),
                    });
                }
                BoardRequest::Clear {
                    generation,
                    respond_to,
                } => {
                    self.orders.clear();
                    self.applied = self.applied.max(generation);
                    info!(generation = self.applied, "Order board cleared");
                    self.updates.send_replace(self.applied);
                    let _ = respond_to.send(());
                }
            }
        }

        info!(size = self.orders.len(), "Order board shutdown");
    }

    fn replace(&mut self, generation: u64, mut orders: Vec<Order>) -> ReplaceOutcome {
        if generation <= self.applied {
            debug!(generation, latest = self.applied, "Discarding stale refresh");
            return ReplaceOutcome::Stale {
                generation,
                latest: self.applied,
            };
        }

        orders.sort_by_key(|o| Reverse(o.id));
        warn_duplicate_tokens(&orders);

        let changed = orders != self.orders;
        self.orders = orders;
        self.applied = generation;
        if changed {
            info!(generation, size = self.orders.len(), "Order board updated");
        } else {
            debug!(generation, "Order board unchanged");
        }
        self.updates.send_replace(generation);
        ReplaceOutcome::Applied { generation }
    }
}

/// Token numbers must be unique among a vendor's open orders; the backend owns
/// that rule, the board only reports violations.
fn warn_duplicate_tokens(orders: &[Order]) {
    let mut seen: HashSet<(Option<VendorId>, TokenNumber)> = HashSet::new();
    let open = orders
        .iter()
        .filter(|o| !matches!(o.status, OrderStatus::Completed | OrderStatus::Cancelled));
    for order in open {
        if let Some(token) = order.token_number {
            if !seen.insert((order.vendor_id, token)) {
                warn!(id = %order.id, %token, "Duplicate pickup token among open orders");
            }
        }
    }
}
