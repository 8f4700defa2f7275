//! Core types for Nutrijoseph.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;

pub use id::{IdError, ProductId};
pub use price::{CurrencyCode, CurrencyError, Price, PriceError};
