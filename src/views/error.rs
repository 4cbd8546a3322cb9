//! Errors and transient notices shown to the operator.

use crate::api::ApiError;
use crate::board::BoardError;
use crate::cart::CartError;
use crate::model::{MenuItemId, Order, OrderId};
use crate::orders::LifecycleError;
use crate::polling::RefreshError;
use crate::session::StorageError;
use std::fmt::Display;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Board(#[from] BoardError),

    /// No session; the route has been moved to Login.
    #[error("Login required")]
    LoginRequired,

    #[error("Vendor account required")]
    VendorOnly,

    #[error("Order {0} is not on the board")]
    UnknownOrder(OrderId),

    #[error("Menu item {0} is not on the menu")]
    UnknownItem(MenuItemId),

    #[error("Menu item {0} is currently unavailable")]
    Unavailable(MenuItemId),

    #[error("Unreadable pickup code: {0}")]
    InvalidCode(String),
}

impl From<RefreshError> for ViewError {
    fn from(e: RefreshError) -> Self {
        match e {
            RefreshError::Api(e) => ViewError::Api(e),
            RefreshError::Board(e) => ViewError::Board(e),
        }
    }
}

impl ViewError {
    pub fn user_message(&self) -> String {
        match self {
            ViewError::Api(e) => e.user_message(),
            ViewError::Storage(_) => "Could not save your session".to_string(),
            other => other.to_string(),
        }
    }

    pub fn notice(&self) -> Notice {
        Notice::error(self.user_message())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A short-lived message shown after a user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn order_placed(order: &Order) -> Self {
        Self::success(format!("Order {} placed successfully!", order.id))
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.level {
            NoticeLevel::Error => write!(f, "error: {}", self.message),
            _ => f.write_str(&self.message),
        }
    }
}
