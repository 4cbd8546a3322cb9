use thiserror::Error;

/// Failures talking to the order board task.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("Order board closed")]
    ActorClosed,
    #[error("Order board dropped response channel")]
    ActorDropped,
}
