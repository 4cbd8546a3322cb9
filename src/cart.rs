//! # Cart
//!
//! Client-only, ephemeral aggregation of menu items into a pending order. Nothing
//! here is persisted; the cart is discarded after a successful checkout or an
//! explicit [`Cart::clear`].

use crate::model::{MenuItem, MenuItemId, OrderCreate, VendorId};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("Cart is empty")]
    Empty,

    /// Every order goes to exactly one vendor.
    #[error("Cart mixes items from {first} and {other}")]
    MixedVendors { first: VendorId, other: VendorId },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CartEntry {
    pub item: MenuItem,
    pub quantity: u32,
}

impl CartEntry {
    pub fn subtotal(&self) -> f64 {
        self.item.price * f64::from(self.quantity)
    }
}

/// Selected items and quantities, in the order they were first added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one unit; an item already in the cart has its quantity incremented.
    pub fn add(&mut self, item: &MenuItem) {
        match self.entries.iter_mut().find(|e| e.item.id == item.id) {
            Some(entry) => entry.quantity += 1,
            None => self.entries.push(CartEntry {
                item: item.clone(),
                quantity: 1,
            }),
        }
    }

    /// Removes one unit; the entry disappears when its last unit is removed.
    ///
    /// Returns `false` when the item was not in the cart.
    pub fn remove(&mut self, id: MenuItemId) -> bool {
        let Some(index) = self.entries.iter().position(|e| e.item.id == id) else {
            return false;
        };
        if self.entries[index].quantity > 1 {
            self.entries[index].quantity -= 1;
        } else {
            self.entries.remove(index);
        }
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn quantity_of(&self, id: MenuItemId) -> u32 {
        self.entries
            .iter()
            .find(|e| e.item.id == id)
            .map_or(0, |e| e.quantity)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of units.
    pub fn units(&self) -> u32 {
        self.entries.iter().map(|e| e.quantity).sum()
    }

    /// Σ price × quantity over all entries.
    pub fn total(&self) -> f64 {
        self.entries.iter().map(CartEntry::subtotal).sum()
    }

    /// Item ids repeated once per unit, as the order endpoint expects.
    pub fn item_ids(&self) -> Vec<MenuItemId> {
        self.entries
            .iter()
            .flat_map(|e| std::iter::repeat(e.item.id).take(e.quantity as usize))
            .collect()
    }

    /// The single vendor every entry belongs to.
    pub fn vendor(&self) -> Result<VendorId, CartError> {
        let first = self.entries.first().ok_or(CartError::Empty)?.item.vendor_id;
        match self.entries.iter().find(|e| e.item.vendor_id != first) {
            Some(other) => Err(CartError::MixedVendors {
                first,
                other: other.item.vendor_id,
            }),
            None => Ok(first),
        }
    }

    /// Builds the order request for checkout.
    pub fn to_order(&self) -> Result<OrderCreate, CartError> {
        Ok(OrderCreate {
            vendor_id: self.vendor()?,
            items: self.item_ids(),
        })
    }
}

/// Menu items matching a search term, in menu order.
pub fn search<'a>(items: &'a [MenuItem], term: &str) -> Vec<&'a MenuItem> {
    items.iter().filter(|item| item.matches(term)).collect()
}
