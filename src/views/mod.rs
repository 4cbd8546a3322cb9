//! # Views
//!
//! View-models behind the two front ends of the client.
//!
//! - [`StudentView`] - menu, cart, checkout, order tracking and pickup codes
//! - [`VendorConsole`] - order queue, status transitions, token lookup, menu admin
//!
//! Operations return `Result<_, ViewError>`; callers turn failures into a
//! transient [`Notice`] with [`ViewError::notice`] and carry on. Nothing here is
//! fatal.

pub mod error;
pub mod student;
pub mod vendor;

pub use error::{Notice, NoticeLevel, ViewError};
pub use student::StudentView;
pub use vendor::{parse_scanned_token, VendorConsole};
