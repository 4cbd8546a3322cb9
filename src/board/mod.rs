//! # Order Board
//!
//! The locally displayed order list, owned by a single actor task.
//!
//! ## Why an actor
//!
//! Refreshes are full read-replace fetches and several may be in flight at once
//! (a slow poll overlapping the next tick, or a poll racing the refetch that
//! follows a status change). Their replies can arrive in any order. Every refresh
//! therefore takes a generation number from [`BoardClient::next_generation`]
//! *before* it is sent, and the [`OrderBoard`] applies a reply only when its
//! generation is newer than the last one applied.
//!
//! ```text
//! poller ──gen 4──▶ GET /orders/ ──────────────────────▶ Replace(4) ✓
//! poller ──gen 5──▶ GET /orders/ ──▶ Replace(5) ✓
//!                                     (Replace(4) arriving now is stale ✗)
//! ```
//!
//! ## Structure
//!
//! - [`actor`] - [`OrderBoard`], the message loop
//! - [`client`] - [`BoardClient`], the typed handle
//! - [`message`] - [`BoardRequest`] and [`ReplaceOutcome`]
//! - [`snapshot`] - [`BoardSnapshot`] and [`QueueStats`]

pub mod actor;
pub mod client;
pub mod error;
pub mod message;
pub mod snapshot;

pub use actor::OrderBoard;
pub use client::BoardClient;
pub use error::BoardError;
pub use message::{BoardRequest, ReplaceOutcome};
pub use snapshot::{BoardSnapshot, QueueStats};

use tokio::task::JoinHandle;

/// Starts a board task and returns its client.
pub fn spawn(buffer_size: usize) -> (BoardClient, JoinHandle<()>) {
    let (board, client) = OrderBoard::new(buffer_size);
    let handle = tokio::spawn(board.run());
    (client, handle)
}
