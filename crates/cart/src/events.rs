//! Observer payloads and registries.
//!
//! Presentation adapters subscribe here instead of polling the cart:
//!
//! - change listeners receive [`CartTotals`] after every mutation
//! - item-added listeners receive the display name of the product just added
//! - warning listeners receive each [`PersistenceWarning`]

use nutrijoseph_core::Price;
use thiserror::Error;

/// Aggregate snapshot delivered to change listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartTotals {
    /// Sum of all line quantities.
    pub total_items: u64,
    /// Sum of unit price times quantity over all lines.
    pub total_price: Price,
}

/// The durable store could not be read or written.
///
/// The cart keeps working in memory; callers may tell the user that the cart
/// will not survive a reload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceWarning {
    #[error("cart could not be saved: {reason}")]
    WriteFailed { reason: String },

    #[error("saved cart could not be read: {reason}")]
    ReadFailed { reason: String },
}

type ChangeListener = Box<dyn FnMut(CartTotals)>;
type ItemAddedListener = Box<dyn FnMut(&str)>;
type WarningListener = Box<dyn FnMut(&PersistenceWarning)>;

/// Registered callbacks, invoked in registration order.
#[derive(Default)]
pub(crate) struct Listeners {
    change: Vec<ChangeListener>,
    item_added: Vec<ItemAddedListener>,
    warning: Vec<WarningListener>,
}

impl Listeners {
    pub(crate) fn on_change(&mut self, listener: impl FnMut(CartTotals) + 'static) {
        self.change.push(Box::new(listener));
    }

    pub(crate) fn on_item_added(&mut self, listener: impl FnMut(&str) + 'static) {
        self.item_added.push(Box::new(listener));
    }

    pub(crate) fn on_warning(&mut self, listener: impl FnMut(&PersistenceWarning) + 'static) {
        self.warning.push(Box::new(listener));
    }

    pub(crate) fn changed(&mut self, totals: CartTotals) {
        for listener in &mut self.change {
            listener(totals);
        }
    }

    pub(crate) fn item_added(&mut self, name: &str) {
        for listener in &mut self.item_added {
            listener(name);
        }
    }

    pub(crate) fn warned(&mut self, warning: &PersistenceWarning) {
        for listener in &mut self.warning {
            listener(warning);
        }
    }

    pub(crate) fn counts(&self) -> (usize, usize, usize) {
        (self.change.len(), self.item_added.len(), self.warning.len())
    }
}
