//! Wire-level data structures exchanged with the canteen backend.
//!
//! Everything here is a plain serde DTO; behaviour lives in the modules that own
//! the corresponding state ([`orders`](crate::orders), [`cart`](crate::cart),
//! [`session`](crate::session)).

pub mod menu;
pub mod order;
pub mod user;

pub use menu::*;
pub use order::*;
pub use user::*;
