//! Nutrijoseph Core - Shared types library.
//!
//! This crate provides common types used across all Nutrijoseph components:
//! - `cart` - The cart state manager and its persistence backends
//! - `cli` - Command-line presentation adapter over the cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no
//! formatting of whole documents. This keeps it lightweight and allows it to
//! be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices, and currencies

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
