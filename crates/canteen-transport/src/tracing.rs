//! # Observability & Tracing
//!
//! [`setup_tracing`] initializes structured logging for every binary in the
//! workspace.
//!
//! ## What Gets Traced
//!
//! - **Requests**: one span per transport call, labelled `METHOD path`
//! - **Session**: login, logout and 401 teardown with the acting username
//! - **Order board**: every applied or discarded refresh with its generation
//! - **Polling**: loop start, stop reason and failed ticks
//!
//! ## Usage Examples
//!
//! ```bash
//! # State changes only
//! RUST_LOG=info canteen orders
//!
//! # Full payloads and per-request spans
//! RUST_LOG=debug canteen watch --vendor
//!
//! # Only the polling loop
//! RUST_LOG=canteen_rush::polling=debug canteen watch
//! ```
//!
//! Functions log full payloads once at `debug` level using the `?field` syntax,
//! everything else stays on one compact line per event.

/// Installs the global `tracing` subscriber.
///
/// Uses `RUST_LOG` for filtering, hides module targets and prints spans inline.
/// Calling it twice is harmless; the second install is ignored.
pub fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .try_init();
}
