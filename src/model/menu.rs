//! Menu items offered by vendors.
//!
//! Items are created and edited by their vendor and never deleted; availability is
//! toggled on its own through a partial [`MenuItemUpdate`].
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for menu items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuItemId(pub u64);

impl From<u64> for MenuItemId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl Display for MenuItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "item_{}", self.0)
    }
}

/// Type-safe identifier for vendor accounts (a vendor is a user with the vendor role).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VendorId(pub u64);

impl From<u64> for VendorId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl Display for VendorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "vendor_{}", self.0)
    }
}

fn available_by_default() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub description: Option<String>,
    /// Minutes.
    pub prep_time_estimate: u32,
    pub vendor_id: VendorId,
    #[serde(default)]
    pub vendor_name: Option<String>,
    #[serde(default = "available_by_default")]
    pub is_available: bool,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl MenuItem {
    /// Case-insensitive substring match on name, description or vendor name.
    ///
    /// An empty search term matches everything.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        let contains = |field: &str| field.to_lowercase().contains(&term);
        contains(&self.name)
            || self.description.as_deref().is_some_and(contains)
            || self.vendor_name.as_deref().is_some_and(contains)
    }
}

/// Payload for creating a new menu item. The backend assigns the vendor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuItemCreate {
    pub name: String,
    pub price: f64,
    pub description: String,
    pub prep_time_estimate: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl MenuItemCreate {
    /// Client-side checks run before the request is sent.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Item name is required".to_string());
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(format!("Invalid price: {}", self.price));
        }
        if self.prep_time_estimate == 0 {
            return Err("Prep time must be at least one minute".to_string());
        }
        Ok(())
    }
}

/// Partial update; only `Some` fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MenuItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prep_time_estimate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
}

impl MenuItemUpdate {
    pub fn availability(is_available: bool) -> Self {
        Self {
            is_available: Some(is_available),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(price) = self.price {
            if !price.is_finite() || price < 0.0 {
                return Err(format!("Invalid price: {price}"));
            }
        }
        if self.prep_time_estimate == Some(0) {
            return Err("Prep time must be at least one minute".to_string());
        }
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err("Item name is required".to_string());
        }
        Ok(())
    }
}

/// Estimated wait returned by the prediction endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Prediction {
    pub predicted_minutes: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn burger() -> MenuItem {
        MenuItem {
            id: MenuItemId(3),
            name: "Spicy Chicken Burger".into(),
            price: 4.5,
            description: Some("Crispy and hot".into()),
            prep_time_estimate: 10,
            vendor_id: VendorId(1),
            vendor_name: Some("Huda".into()),
            is_available: true,
            image_url: None,
        }
    }

    #[test]
    fn test_search_matches_name_description_and_vendor() {
        let item = burger();
        assert!(item.matches("burger"));
        assert!(item.matches("CRISPY"));
        assert!(item.matches("huda"));
        assert!(item.matches("  "));
        assert!(!item.matches("dosa"));
    }

    #[test]
    fn test_defaults_when_fields_missing() {
        let item: MenuItem = serde_json::from_value(serde_json::json!({
            "id": 7,
            "name": "Masala Dosa",
            "price": 3.0,
            "prep_time_estimate": 12,
            "vendor_id": 1
        }))
        .unwrap();
        assert!(item.is_available);
        assert_eq!(item.description, None);
    }

    #[test]
    fn test_create_validation() {
        let mut create = MenuItemCreate {
            name: "Tea".into(),
            price: 1.0,
            description: String::new(),
            prep_time_estimate: 2,
            image_url: None,
        };
        assert!(create.validate().is_ok());

        create.price = -1.0;
        assert!(create.validate().is_err());

        create.price = 1.0;
        create.prep_time_estimate = 0;
        assert!(create.validate().is_err());

        create.prep_time_estimate = 2;
        create.name = "  ".into();
        assert!(create.validate().is_err());
    }

    #[test]
    fn test_partial_update_serializes_only_set_fields() {
        let update = MenuItemUpdate::availability(false);
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({"is_available": false})
        );
    }
}
