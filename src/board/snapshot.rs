use crate::model::{Order, OrderId, OrderStatus, TokenNumber};
use crate::orders::is_active;

/// Dashboard counters derived from the current order list.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct QueueStats {
    pub total_orders: usize,
    /// Orders still in the kitchen (`ordered` or `preparing`).
    pub active_orders: usize,
    /// Σ total_price over every order that was not cancelled.
    pub revenue: f64,
}

/// Immutable copy of the board at one generation. Orders are newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardSnapshot {
    /// Generation of the refresh these orders came from; 0 before the first one.
    pub generation: u64,
    pub orders: Vec<Order>,
}

impl BoardSnapshot {
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Whether any refresh has been applied yet.
    pub fn is_loaded(&self) -> bool {
        self.generation > 0
    }

    pub fn find(&self, id: OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    pub fn find_by_token(&self, token: TokenNumber) -> Option<&Order> {
        self.orders.iter().find(|o| o.token_number == Some(token))
    }

    pub fn active(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter().filter(|o| is_active(o.status))
    }

    pub fn stats(&self) -> QueueStats {
        QueueStats {
            total_orders: self.orders.len(),
            active_orders: self.active().count(),
            revenue: self
                .orders
                .iter()
                .filter(|o| o.status != OrderStatus::Cancelled)
                .map(|o| o.total_price)
                .sum(),
        }
    }
}
