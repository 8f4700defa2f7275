//! Integration tests for the Nutrijoseph cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p nutrijoseph-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - Reload round-trips through memory and file storage
//! - `cart_degraded` - Behavior when storage reads or writes fail
//! - `cart_invariants` - Uniqueness and aggregate properties over mutation sequences
//!
//! The helpers below build products and carts shared by all test files.

#![cfg_attr(not(test), forbid(unsafe_code))]

use nutrijoseph_cart::NewProduct;

/// Storage key used by every integration test.
pub const TEST_KEY: &str = "nutrijoseph_cart";

/// Build a product named after its ID.
///
/// # Panics
///
/// Panics if `id` or `price` is invalid; test inputs are always valid.
#[must_use]
#[allow(clippy::expect_used)]
pub fn product(id: &str, price: &str) -> NewProduct {
    NewProduct::parse(id, format!("Product {id}"), price, format!("img/{id}.jpg"))
        .expect("test product should be valid")
}
