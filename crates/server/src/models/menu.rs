//! Menu catalog types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use forno_core::ProductId;

/// An item on the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Numeric product ID used in baskets.
    pub product_id: ProductId,
    /// Item name as shown to customers.
    pub name: String,
    /// Unit price in the currency's standard unit (e.g., 42.50).
    pub price: Decimal,
}

impl MenuItem {
    /// Create a new menu item.
    #[must_use]
    pub const fn new(product_id: ProductId, name: String, price: Decimal) -> Self {
        Self {
            product_id,
            name,
            price,
        }
    }
}
