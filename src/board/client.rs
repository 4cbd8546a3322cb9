use crate::board::{BoardError, BoardRequest, BoardSnapshot, ReplaceOutcome};
use crate::model::Order;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};

/// Handle to a running [`OrderBoard`](crate::board::OrderBoard).
///
/// Clones share the generation counter, so every refresh cycle of every
/// poller gets a distinct, increasing number.
#[derive(Clone)]
pub struct BoardClient {
    sender: mpsc::Sender<BoardRequest>,
    issued: Arc<AtomicU64>,
    updates: watch::Receiver<u64>,
}

impl BoardClient {
    pub fn new(sender: mpsc::Sender<BoardRequest>, updates: watch::Receiver<u64>) -> Self {
        Self {
            sender,
            issued: Arc::new(AtomicU64::new(0)),
            updates,
        }
    }

    /// Issues the generation for a refresh about to be sent.
    pub fn next_generation(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Submits the result of the refresh issued as `generation`.
    pub async fn apply(
        &self,
        generation: u64,
        orders: Vec<Order>,
    ) -> Result<ReplaceOutcome, BoardError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(BoardRequest::Replace {
                generation,
                orders,
                respond_to,
            })
            .await
            .map_err(|_| BoardError::ActorClosed)?;
        response.await.map_err(|_| BoardError::ActorDropped)
    }

    pub async fn snapshot(&self) -> Result<BoardSnapshot, BoardError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(BoardRequest::Snapshot { respond_to })
            .await
            .map_err(|_| BoardError::ActorClosed)?;
        response.await.map_err(|_| BoardError::ActorDropped)
    }

    /// Empties the board; refreshes issued before this call are discarded.
    pub async fn clear(&self) -> Result<(), BoardError> {
        let generation = self.next_generation();
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(BoardRequest::Clear {
                generation,
                respond_to,
            })
            .await
            .map_err(|_| BoardError::ActorClosed)?;
        response.await.map_err(|_| BoardError::ActorDropped)
    }

    /// Receives the generation of every applied refresh or clear.
    pub fn updates(&self) -> watch::Receiver<u64> {
        self.updates.clone()
    }
}
