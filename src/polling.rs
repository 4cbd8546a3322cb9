//! # Polling Refresh
//!
//! Periodic full re-fetch of the order list into the [`OrderBoard`](crate::board::OrderBoard).
//!
//! A poller is bound to the session that was current when it started. It stops,
//! aborting any fetch still in flight, when:
//!
//! - its [`PollHandle`] is stopped or dropped (the view went away)
//! - the session ends or is replaced (logout, 401 teardown, new login)
//!
//! Ordering of replies is not the poller's concern: each tick takes a generation
//! from the board before sending, and the board discards stale replies.

use crate::api::{ApiClient, ApiError};
use crate::board::{BoardClient, BoardError, ReplaceOutcome};
use crate::session::Session;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// What to do with a tick while a previous fetch is still outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapPolicy {
    /// Send anyway; the board sorts out reply order.
    #[default]
    Allow,
    SkipWhileInFlight,
}

/// Why a poll loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollExit {
    Stopped,
    SessionEnded,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RefreshError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// One read-replace cycle: issue a generation, fetch, submit.
pub async fn refresh_board(
    api: &ApiClient,
    board: &BoardClient,
) -> Result<ReplaceOutcome, RefreshError> {
    let generation = board.next_generation();
    let orders = api.fetch_orders().await?;
    Ok(board.apply(generation, orders).await?)
}

/// A poll cycle; sends nothing once `bound` is no longer the current session.
async fn fetch_and_apply(
    api: &ApiClient,
    board: &BoardClient,
    generation: u64,
    bound: &Arc<Session>,
) -> Result<ReplaceOutcome, RefreshError> {
    let orders = api.fetch_orders_as(bound).await?;
    Ok(board.apply(generation, orders).await?)
}

/// Owns a running poll loop. Dropping it aborts the loop.
pub struct PollHandle {
    stop: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<PollExit>>,
}

impl PollHandle {
    /// Stops the loop and waits for it to wind down.
    pub async fn stop(mut self) -> PollExit {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        self.join().await
    }

    /// Waits until the loop ends on its own (session ended).
    pub async fn wait(mut self) -> PollExit {
        self.join().await
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }

    async fn join(&mut self) -> PollExit {
        match self.task.take() {
            Some(task) => task.await.unwrap_or(PollExit::Stopped),
            None => PollExit::Stopped,
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Poll loop configuration.
#[derive(Debug, Clone, Copy)]
pub struct Poller {
    interval: Duration,
    policy: OverlapPolicy,
    immediate: bool,
}

impl Poller {
    /// Fetches right away, then every `interval`.
    pub fn every(interval: Duration) -> Self {
        Self {
            interval,
            policy: OverlapPolicy::default(),
            immediate: true,
        }
    }

    pub fn policy(mut self, policy: OverlapPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The caller already loaded the board; the first tick waits one interval.
    pub fn after_initial_load(mut self) -> Self {
        self.immediate = false;
        self
    }

    pub fn spawn(self, api: ApiClient, board: BoardClient) -> PollHandle {
        let (stop_tx, stop_rx) = oneshot::channel();
        let task = tokio::spawn(run(api, board, self, stop_rx));
        PollHandle {
            stop: Some(stop_tx),
            task: Some(task),
        }
    }
}

/// Starts polling `GET /orders/` every `interval`, beginning immediately.
pub fn spawn_order_poller(
    api: ApiClient,
    board: BoardClient,
    interval: Duration,
    policy: OverlapPolicy,
) -> PollHandle {
    Poller::every(interval).policy(policy).spawn(api, board)
}

fn is_same(current: Option<&Arc<Session>>, bound: &Arc<Session>) -> bool {
    current.is_some_and(|s| Arc::ptr_eq(s, bound))
}

async fn run(
    api: ApiClient,
    board: BoardClient,
    poller: Poller,
    mut stop: oneshot::Receiver<()>,
) -> PollExit {
    let Poller {
        interval,
        policy,
        immediate,
    } = poller;
    let mut session_rx = api.session().subscribe();
    let Some(bound) = session_rx.borrow_and_update().clone() else {
        debug!("No session, poller not started");
        return PollExit::SessionEnded;
    };
    info!(username = %bound.username, ?interval, ?policy, "Polling started");

    let start = if immediate {
        Instant::now()
    } else {
        Instant::now() + interval
    };
    let mut ticker = tokio::time::interval_at(start, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut in_flight: JoinSet<Result<ReplaceOutcome, RefreshError>> = JoinSet::new();

    let exit = loop {
        tokio::select! {
            biased;

            _ = &mut stop => break PollExit::Stopped,

            changed = session_rx.changed() => {
                let still_bound = changed.is_ok()
                    && is_same(session_rx.borrow_and_update().as_ref(), &bound);
                if !still_bound {
                    break PollExit::SessionEnded;
                }
            }

            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                match joined {
                    Ok(Ok(ReplaceOutcome::Applied { generation })) => {
                        debug!(generation, "Refresh applied");
                    }
                    Ok(Ok(ReplaceOutcome::Stale { generation, latest })) => {
                        debug!(generation, latest, "Refresh superseded");
                    }
                    Ok(Err(RefreshError::Api(ApiError::SessionChanged))) => {
                        debug!("Refresh dropped, session changed");
                    }
                    Ok(Err(e)) => warn!(error = %e, "Refresh failed"),
                    Err(e) if e.is_cancelled() => {}
                    Err(e) => warn!(error = %e, "Refresh task failed"),
                }
            }

            _ = ticker.tick() => {
                if !is_same(api.session().current().as_ref(), &bound) {
                    break PollExit::SessionEnded;
                }
                if policy == OverlapPolicy::SkipWhileInFlight && !in_flight.is_empty() {
                    debug!(pending = in_flight.len(), "Previous refresh in flight, skipping tick");
                    continue;
                }
                let generation = board.next_generation();
                let (api, board, bound) = (api.clone(), board.clone(), Arc::clone(&bound));
                in_flight.spawn(async move {
                    fetch_and_apply(&api, &board, generation, &bound).await
                });
            }
        }
    };

    in_flight.abort_all();
    info!(?exit, "Polling stopped");
    exit
}
