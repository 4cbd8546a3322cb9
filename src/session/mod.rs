//! # Auth Session
//!
//! Process-wide identity state: who is signed in, with which bearer token and role.
//!
//! ## Overview
//!
//! The [`SessionStore`] owns the current [`Session`] and publishes it through a
//! `tokio::sync::watch` channel. Consumers never read storage directly; they either
//! take a snapshot ([`SessionStore::current`]) or subscribe and react to changes
//! (the polling loop does this to stop itself on sign-out).
//!
//! A session is immutable once published. It ends through exactly one path,
//! the store's teardown, triggered either by an explicit logout or by any API call
//! answering 401.
//!
//! ## Structure
//!
//! - [`store`] - [`SessionStore`], [`Session`] and the teardown event
//! - [`storage`] - durable key/value persistence ([`FileStorage`], [`MemoryStorage`])
//! - [`route`] - [`Route`] targets and the role guard
//!
//! ## Usage
//!
//! ```rust
//! use canteen_rush::model::{Role, UserId};
//! use canteen_rush::session::{MemoryStorage, Route, Session, SessionStore};
//! use std::sync::Arc;
//!
//! let store = SessionStore::restore(Arc::new(MemoryStorage::new()));
//! assert!(store.current().is_none());
//!
//! let landing = store
//!     .login(Session::new("jwt", "huda", Role::Vendor, UserId(1)))
//!     .unwrap();
//! assert_eq!(landing, Route::Vendor);
//!
//! store.logout();
//! assert_eq!(store.route(), Route::Home);
//! ```

pub mod route;
pub mod storage;
pub mod store;

pub use route::*;
pub use storage::*;
pub use store::*;
