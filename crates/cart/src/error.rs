//! Caller-visible cart errors.
//!
//! Validation failures are the only hard errors the cart returns. Storage
//! problems are reported as [`crate::PersistenceWarning`] values instead, so a
//! storage hiccup never interrupts the shopping flow.

use nutrijoseph_core::{IdError, PriceError};
use thiserror::Error;

/// Malformed input to a cart mutation. The mutation is rejected and the cart
/// is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The product ID is blank or too long.
    #[error("invalid product id: {0}")]
    Id(#[from] IdError),

    /// The product price is not a non-negative amount with at most two decimals.
    #[error("invalid price: {0}")]
    Price(#[from] PriceError),

    /// Adding one more unit would overflow the quantity counter.
    #[error("quantity limit reached for product {id}")]
    QuantityOverflow {
        /// The product whose quantity is saturated.
        id: String,
    },

    /// The cart total would no longer fit in a price.
    #[error("cart total exceeds the maximum amount")]
    TotalOverflow,
}

/// Cart-level error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// Input validation failed.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl From<IdError> for CartError {
    fn from(err: IdError) -> Self {
        Self::Validation(err.into())
    }
}

impl From<PriceError> for CartError {
    fn from(err: PriceError) -> Self {
        Self::Validation(err.into())
    }
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_error_display() {
        let err = CartError::from(IdError::Empty);
        assert_eq!(
            err.to_string(),
            "Validation error: invalid product id: product id cannot be empty"
        );

        let err = CartError::from(PriceError::Negative);
        assert_eq!(
            err.to_string(),
            "Validation error: invalid price: price cannot be negative"
        );
    }

    #[test]
    fn test_overflow_names_product() {
        let err = ValidationError::QuantityOverflow {
            id: "p1".to_string(),
        };
        assert_eq!(err.to_string(), "quantity limit reached for product p1");
        assert_eq!(
            ValidationError::TotalOverflow.to_string(),
            "cart total exceeds the maximum amount"
        );
    }
}
