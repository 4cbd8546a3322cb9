//! # Canteen Rush
//!
//! > **Client core for campus food pre-ordering.**
//!
//! Students browse a menu, build a cart, place orders and track them until pickup.
//! Vendors run a live order queue, move orders through their lifecycle and verify
//! pickup tokens at the counter. Everything authoritative (accounts, orders, token
//! issuance, pickup prediction) lives in a remote HTTP backend; this crate is the
//! client side of that contract.
//!
//! ## Architecture Notes
//!
//! ### 1. One seam to the backend
//! Every call goes through [`canteen_transport::Transport`]. Production uses the
//! reqwest-backed `HttpTransport`; tests use `MockTransport` and assert on the
//! exact requests that would have been sent.
//!
//! ### 2. One exit for a session
//! A session ends only through [`SessionStore::teardown`](session::SessionStore::teardown),
//! whether the user logged out or the backend answered 401. Storage, published
//! state, route and the order board all follow from that single event.
//!
//! ### 3. Generation-ordered refresh
//! The order list is owned by an actor ([`board::OrderBoard`]). Each refresh takes a
//! generation number before it is sent; replies older than the last applied one
//! are dropped, so a slow poll can never overwrite a newer list.
//!
//! ### 4. Check before you send
//! Status transitions are validated against the order's last known status
//! ([`orders::check_transition`]) and refused locally when they would walk an
//! order backwards. The backend still decides.
//!
//! ## Module Tour
//!
//! - [`model`] - serde DTOs: orders, menu items, accounts
//! - [`session`] - [`SessionStore`](session::SessionStore), storage, routes
//! - [`api`] - [`ApiClient`](api::ApiClient) and [`ApiError`](api::ApiError)
//! - [`orders`] - the order lifecycle state machine
//! - [`cart`] - cart and menu search
//! - [`board`] - the order board actor
//! - [`polling`] - periodic refresh loops
//! - [`views`] - [`StudentView`](views::StudentView) and [`VendorConsole`](views::VendorConsole)
//! - [`runtime`] - [`CanteenApp`](runtime::CanteenApp), wiring and shutdown
//! - [`config`] - environment configuration
//!
//! ## Running
//!
//! ```bash
//! RUST_LOG=info canteen login huda
//! RUST_LOG=info canteen watch
//! ```

pub mod api;
pub mod board;
pub mod cart;
pub mod config;
pub mod model;
pub mod orders;
pub mod polling;
pub mod runtime;
pub mod session;
pub mod views;
