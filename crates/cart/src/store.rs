//! The cart store.
//!
//! [`CartStore`] is the single owner of the session's line items. Every
//! mutation runs to completion before returning: the in-memory list is
//! updated, the full list is re-persisted, then listeners are notified.
//!
//! Storage failures never fail a mutation. The in-memory state stays
//! authoritative, the store is marked degraded, and a [`PersistenceWarning`]
//! is both returned and broadcast.

use chrono::{DateTime, Utc};
use nutrijoseph_core::{CurrencyCode, Price};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::codec;
use crate::config::CartConfig;
use crate::error::{Result, ValidationError};
use crate::events::{CartTotals, Listeners, PersistenceWarning};
use crate::line_item::{LineItem, NewProduct};
use crate::storage::{KeyValueStore, StorageError};
use crate::view::CartView;

/// Result of [`CartStore::add_item`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOutcome {
    /// Quantity of the product's line after the add.
    pub quantity: u32,
    /// Set if the updated cart could not be persisted.
    pub persistence: Option<PersistenceWarning>,
}

/// Result of a removal or clear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    /// Whether the cart contents changed.
    pub changed: bool,
    /// Set if the updated cart could not be persisted.
    pub persistence: Option<PersistenceWarning>,
}

/// Snapshot of a cart taken at checkout, just before it was emptied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub id: Uuid,
    pub placed_at: DateTime<Utc>,
    pub items: Vec<LineItem>,
    pub total_items: u64,
    pub total_price: Price,
    /// Set if the emptied cart could not be persisted.
    pub persistence: Option<PersistenceWarning>,
}

/// Session cart backed by a key-value persistence slot.
pub struct CartStore<S> {
    backend: S,
    key: String,
    items: Vec<LineItem>,
    total_price: Price,
    listeners: Listeners,
    degraded: bool,
    load_warning: Option<PersistenceWarning>,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Open the cart stored at `key`, hydrating from whatever is persisted.
    ///
    /// A missing or unreadable payload yields an empty cart. If the backend
    /// itself fails, the cart starts empty and degraded, and the failure is
    /// available from [`Self::take_load_warning`].
    pub fn open(backend: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let ((items, total_price), load_warning) = match backend.get(&key) {
            Ok(None) => {
                debug!(key = %key, "No saved cart, starting empty");
                ((Vec::new(), Price::ZERO), None)
            }
            Ok(Some(raw)) => match codec::decode_with_total(&raw) {
                Ok(restored) => {
                    info!(key = %key, lines = restored.0.len(), "Restored saved cart");
                    (restored, None)
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "Discarding unreadable saved cart");
                    ((Vec::new(), Price::ZERO), None)
                }
            },
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to read saved cart, continuing in memory");
                (
                    (Vec::new(), Price::ZERO),
                    Some(PersistenceWarning::ReadFailed {
                        reason: e.to_string(),
                    }),
                )
            }
        };

        Self {
            backend,
            key,
            items,
            total_price,
            listeners: Listeners::default(),
            degraded: load_warning.is_some(),
            load_warning,
        }
    }

    /// Open the cart at the configured storage key.
    pub fn from_config(backend: S, config: &CartConfig) -> Self {
        Self::open(backend, config.storage_key.clone())
    }

    /// Register a listener called with the new totals after every mutation.
    pub fn on_change(&mut self, listener: impl FnMut(CartTotals) + 'static) {
        self.listeners.on_change(listener);
    }

    /// Register a listener called with the product name on every add.
    pub fn on_item_added(&mut self, listener: impl FnMut(&str) + 'static) {
        self.listeners.on_item_added(listener);
    }

    /// Register a listener called with every persistence warning.
    pub fn on_persistence_warning(
        &mut self,
        listener: impl FnMut(&PersistenceWarning) + 'static,
    ) {
        self.listeners.on_warning(listener);
    }

    /// Add one unit of `product`.
    ///
    /// A product already in the cart keeps its original name, price and image
    /// and only has its quantity bumped. New products are appended.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Validation` if the quantity or the cart total
    /// would overflow. The cart is left unchanged.
    #[instrument(skip(self, product), fields(product_id = %product.id()))]
    pub fn add_item(&mut self, product: NewProduct) -> Result<AddOutcome> {
        let name = product.name().to_owned();
        let quantity = match self.items.iter_mut().find(|item| item.id() == product.id()) {
            Some(existing) => {
                let total_price = self
                    .total_price
                    .checked_add(existing.unit_price())
                    .ok_or(ValidationError::TotalOverflow)?;
                let quantity = existing.increment()?;
                self.total_price = total_price;
                quantity
            }
            None => {
                self.total_price = self
                    .total_price
                    .checked_add(product.unit_price())
                    .ok_or(ValidationError::TotalOverflow)?;
                self.items.push(LineItem::from(product));
                1
            }
        };
        debug!(quantity, "Added item to cart");

        let persistence = self.persist();
        self.notify_changed();
        self.listeners.item_added(&name);

        Ok(AddOutcome {
            quantity,
            persistence,
        })
    }

    /// Remove the whole line for `id`. Removing an absent ID is a no-op that
    /// neither writes to storage nor notifies listeners.
    #[instrument(skip(self))]
    pub fn remove_item(&mut self, id: &str) -> Mutation {
        let Some(index) = self.items.iter().position(|item| item.id().as_str() == id) else {
            debug!("Product not in cart, nothing to remove");
            return Mutation {
                changed: false,
                persistence: None,
            };
        };

        let removed = self.items.remove(index);
        self.total_price = self.total_price.saturating_sub(removed.line_total());
        debug!("Removed item from cart");
        let persistence = self.persist();
        self.notify_changed();
        Mutation {
            changed: true,
            persistence,
        }
    }

    /// Empty the cart, persist, and notify.
    #[instrument(skip(self))]
    pub fn clear(&mut self) -> Mutation {
        let changed = !self.items.is_empty();
        self.items.clear();
        self.total_price = Price::ZERO;
        debug!(changed, "Cleared cart");

        let persistence = self.persist();
        self.notify_changed();
        Mutation {
            changed,
            persistence,
        }
    }

    /// Confirm the order: capture a receipt and empty the cart.
    ///
    /// Returns `None` without touching anything if the cart is empty.
    #[instrument(skip(self))]
    pub fn checkout(&mut self) -> Option<Receipt> {
        if self.items.is_empty() {
            debug!("Checkout requested on empty cart");
            return None;
        }

        let items = self.items.clone();
        let total_items = self.total_items();
        let total_price = self.total_price();
        let persistence = self.clear().persistence;

        let receipt = Receipt {
            id: Uuid::new_v4(),
            placed_at: Utc::now(),
            items,
            total_items,
            total_price,
            persistence,
        };
        info!(
            receipt_id = %receipt.id,
            total_items,
            total_price = %total_price,
            "Checked out cart"
        );
        Some(receipt)
    }

    /// Empty the cart and delete its persistence slot entirely.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the slot could not be deleted. The in-memory
    /// cart is empty either way.
    #[instrument(skip(self))]
    pub fn purge(&mut self) -> std::result::Result<(), StorageError> {
        self.items.clear();
        self.total_price = Price::ZERO;
        self.notify_changed();
        self.backend.remove(&self.key)?;
        self.degraded = false;
        info!(key = %self.key, "Purged saved cart");
        Ok(())
    }

    /// Sum of all quantities; `0` for an empty cart.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity())).sum()
    }

    /// Exact sum of unit price times quantity, in minor units.
    ///
    /// Adds that would push this past `u64::MAX` minor units are rejected with
    /// `ValidationError::TotalOverflow`.
    #[must_use]
    pub const fn total_price(&self) -> Price {
        self.total_price
    }

    /// Both aggregates at once.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        CartTotals {
            total_items: self.total_items(),
            total_price: self.total_price(),
        }
    }

    /// Copy of the line items in insertion order.
    #[must_use]
    pub fn items(&self) -> Vec<LineItem> {
        self.items.clone()
    }

    /// Copy of the line for `id`, if present.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<LineItem> {
        self.items
            .iter()
            .find(|item| item.id().as_str() == id)
            .cloned()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Display model of the current cart.
    #[must_use]
    pub fn view(&self, currency: CurrencyCode) -> CartView {
        CartView::from_items(&self.items, self.total_price, currency)
    }

    /// Whether the last storage access failed, meaning the cart may not
    /// survive a reload.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// The read failure from construction, if any. Returns it only once.
    pub const fn take_load_warning(&mut self) -> Option<PersistenceWarning> {
        self.load_warning.take()
    }

    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.key
    }

    /// Tear the store down, handing back its backend.
    pub fn into_backend(self) -> S {
        self.backend
    }

    fn persist(&mut self) -> Option<PersistenceWarning> {
        let result = codec::encode(&self.items)
            .map_err(|e| e.to_string())
            .and_then(|raw| {
                self.backend
                    .set(&self.key, &raw)
                    .map_err(|e| e.to_string())
            });

        match result {
            Ok(()) => {
                if self.degraded {
                    info!(key = %self.key, "Cart persistence recovered");
                }
                self.degraded = false;
                None
            }
            Err(reason) => {
                warn!(key = %self.key, error = %reason, "Failed to persist cart, continuing in memory");
                self.degraded = true;
                let warning = PersistenceWarning::WriteFailed { reason };
                self.listeners.warned(&warning);
                Some(warning)
            }
        }
    }

    fn notify_changed(&mut self) {
        let totals = self.totals();
        self.listeners.changed(totals);
    }
}

impl<S> std::fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (change, item_added, warning) = self.listeners.counts();
        f.debug_struct("CartStore")
            .field("key", &self.key)
            .field("items", &self.items)
            .field("total_price", &self.total_price)
            .field("degraded", &self.degraded)
            .field("change_listeners", &change)
            .field("item_added_listeners", &item_added)
            .field("warning_listeners", &warning)
            .finish_non_exhaustive()
    }
}
