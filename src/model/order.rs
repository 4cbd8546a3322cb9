//! Represents a student's pre-order as reported by the backend.
//!
//! Orders are created by students and afterwards only change through
//! vendor-initiated status transitions (see [`crate::orders`]). Once an order
//! is `completed` it never changes again.
use crate::model::{MenuItem, MenuItemId, UserId, VendorId};
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Type-safe identifier for Orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u64);

impl From<u64> for OrderId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Short numeric pickup credential shown to the student and checked by the vendor.
///
/// Not to be confused with the bearer token of a [`Session`](crate::session::Session).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenNumber(pub u32);

impl Display for TokenNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TokenNumber {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(TokenNumber)
    }
}

/// Order status as reported by the backend.
///
/// The backend stores free text; anything unrecognized becomes [`OrderStatus::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Ordered,
    Preparing,
    Ready,
    Completed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Ordered => "ordered",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Unknown => "unknown",
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub menu_item_id: MenuItemId,
    pub quantity: u32,
    #[serde(default)]
    pub menu_item: Option<MenuItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub status: OrderStatus,
    pub total_price: f64,
    #[serde(deserialize_with = "timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(deserialize_with = "timestamp")]
    pub predicted_pickup_time: NaiveDateTime,
    #[serde(default)]
    pub vendor_id: Option<VendorId>,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub token_number: Option<TokenNumber>,
    #[serde(default)]
    pub queue_position: Option<u32>,
    #[serde(default)]
    pub items: Vec<OrderLine>,
}

impl Order {
    /// Token shown on the pickup ticket: the token number, or the zero-padded id.
    pub fn display_token(&self) -> String {
        match self.token_number {
            Some(token) => token.to_string(),
            None => format!("{:04}", self.id.0),
        }
    }

    /// Payload encoded into the pickup QR code, when a token was assigned.
    pub fn pickup_code(&self) -> Option<PickupCode> {
        self.token_number.map(|token| PickupCode { id: self.id, token })
    }
}

/// Accepts both naive timestamps (`2024-05-01T12:30:00.123456`) and RFC 3339 ones,
/// normalizing the latter to UTC.
fn timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
    let raw = String::deserialize(deserializer)?;
    if let Ok(naive) = raw.parse::<NaiveDateTime>() {
        return Ok(naive);
    }
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.naive_utc())
        .map_err(serde::de::Error::custom)
}

/// Payload for placing an order: item ids repeated once per unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderCreate {
    pub items: Vec<MenuItemId>,
    pub vendor_id: VendorId,
}

/// Contents of the pickup QR code: `{"id": <order id>, "token": <token number>}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickupCode {
    pub id: OrderId,
    pub token: TokenNumber,
}

impl PickupCode {
    pub fn encode(&self) -> String {
        // Two integer fields cannot fail to serialize.
        serde_json::to_string(self).unwrap_or_default()
    }
}
