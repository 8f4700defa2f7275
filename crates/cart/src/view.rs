//! Display-ready cart model.
//!
//! Presentation adapters render these instead of formatting line items
//! themselves. All amounts are pre-formatted with the currency symbol.

use nutrijoseph_core::{CurrencyCode, Price};
use serde::Serialize;

use crate::line_item::LineItem;

/// Cart item display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    /// Unit price, e.g. `S/49.90`.
    pub price: String,
    /// Unit price times quantity.
    pub line_price: String,
}

/// Cart display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u64,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty(currency: CurrencyCode) -> Self {
        Self {
            items: Vec::new(),
            subtotal: Price::ZERO.display(currency),
            item_count: 0,
        }
    }

    /// Build the view for a list of line items whose total is `subtotal`.
    #[must_use]
    pub fn from_items(items: &[LineItem], subtotal: Price, currency: CurrencyCode) -> Self {
        Self {
            items: items
                .iter()
                .map(|item| CartItemView::new(item, currency))
                .collect(),
            subtotal: subtotal.display(currency),
            item_count: items.iter().map(|item| u64::from(item.quantity())).sum(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl CartItemView {
    fn new(item: &LineItem, currency: CurrencyCode) -> Self {
        Self {
            id: item.id().to_string(),
            name: item.name().to_string(),
            image: item.image_ref().to_string(),
            quantity: item.quantity(),
            price: item.unit_price().display(currency),
            line_price: item.line_total().display(currency),
        }
    }
}

/// Text of the transient notification shown after a product is added.
#[must_use]
pub fn added_notification(name: &str) -> String {
    format!("{name} añadido al carrito")
}
