//! Runtime orchestration and lifecycle management.
//!
//! [`CanteenApp`] builds the transport, restores the session, starts the order
//! board and hands out views. It also keeps the board in step with the session:
//! when the session ends, the board is emptied so a later sign-in never sees the
//! previous user's orders.

pub mod app;

pub use app::*;
