//! Product input and stored cart lines.

use nutrijoseph_core::{Price, ProductId};

use crate::error::ValidationError;

/// A product offered for addition to the cart.
///
/// Constructing one validates the ID and price, so the cart never sees a blank
/// key or a malformed amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    id: ProductId,
    name: String,
    unit_price: Price,
    image_ref: String,
}

impl NewProduct {
    /// Create a product from an already-typed price.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Id` if the ID is blank or too long.
    pub fn new(
        id: &str,
        name: impl Into<String>,
        unit_price: Price,
        image_ref: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: ProductId::parse(id)?,
            name: name.into(),
            unit_price,
            image_ref: image_ref.into(),
        })
    }

    /// Create a product from raw strings, as read from catalog markup.
    ///
    /// Malformed prices are rejected rather than coerced to zero.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Id` for a blank ID and
    /// `ValidationError::Price` for a price that is not a non-negative amount
    /// with at most two decimals.
    pub fn parse(
        id: &str,
        name: impl Into<String>,
        unit_price: &str,
        image_ref: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let unit_price = Price::parse(unit_price)?;
        Self::new(id, name, unit_price, image_ref)
    }

    #[must_use]
    pub const fn id(&self) -> &ProductId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn unit_price(&self) -> Price {
        self.unit_price
    }

    #[must_use]
    pub fn image_ref(&self) -> &str {
        &self.image_ref
    }
}

/// One product entry in the cart.
///
/// Name, price and image are a snapshot taken when the product was first
/// added; re-adding the same ID only bumps the quantity. Quantity is always at
/// least 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    id: ProductId,
    name: String,
    unit_price: Price,
    image_ref: String,
    quantity: u32,
    line_total: Price,
}

impl LineItem {
    /// Rebuild a line item from stored fields.
    ///
    /// Returns `None` if `quantity` is zero or the line total does not fit in
    /// a [`Price`].
    #[must_use]
    pub fn restore(
        id: ProductId,
        name: String,
        unit_price: Price,
        image_ref: String,
        quantity: u32,
    ) -> Option<Self> {
        if quantity == 0 {
            return None;
        }
        let line_total = unit_price.checked_mul(quantity)?;
        Some(Self {
            id,
            name,
            unit_price,
            image_ref,
            quantity,
            line_total,
        })
    }

    #[must_use]
    pub const fn id(&self) -> &ProductId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn unit_price(&self) -> Price {
        self.unit_price
    }

    #[must_use]
    pub fn image_ref(&self) -> &str {
        &self.image_ref
    }

    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Price of this line: unit price times quantity.
    #[must_use]
    pub const fn line_total(&self) -> Price {
        self.line_total
    }

    /// Add one unit, returning the new quantity.
    pub(crate) fn increment(&mut self) -> Result<u32, ValidationError> {
        let quantity =
            self.quantity
                .checked_add(1)
                .ok_or_else(|| ValidationError::QuantityOverflow {
                    id: self.id.to_string(),
                })?;
        self.line_total = self
            .unit_price
            .checked_mul(quantity)
            .ok_or(ValidationError::TotalOverflow)?;
        self.quantity = quantity;
        Ok(self.quantity)
    }
}

impl From<NewProduct> for LineItem {
    fn from(product: NewProduct) -> Self {
        Self {
            id: product.id,
            name: product.name,
            unit_price: product.unit_price,
            image_ref: product.image_ref,
            quantity: 1,
            line_total: product.unit_price,
        }
    }
}
