//! Nutrijoseph Cart - Session cart state manager.
//!
//! The [`CartStore`] owns the ordered list of line items for one session,
//! mirrors it into a durable key-value slot after every mutation, and answers
//! aggregate queries (item count, total price). Presentation code subscribes
//! to change notifications instead of reaching into cart state.
//!
//! # Modules
//!
//! - [`store`] - The cart store and its mutation results
//! - [`line_item`] - Validated product input and stored line items
//! - [`codec`] - Persisted JSON format
//! - [`storage`] - Key-value backends (memory, file, failure injection)
//! - [`events`] - Observer payloads and persistence warnings
//! - [`view`] - Display-ready cart model
//! - [`config`] - Environment configuration
//!
//! # Example
//!
//! ```
//! use nutrijoseph_cart::{CartStore, NewProduct, storage::MemoryStore};
//!
//! let mut cart = CartStore::open(MemoryStore::new(), "nutrijoseph_cart");
//! let product = NewProduct::parse("p1", "Protein", "49.90", "p1.png").unwrap();
//! cart.add_item(product.clone()).unwrap();
//! cart.add_item(product).unwrap();
//!
//! assert_eq!(cart.total_items(), 2);
//! assert_eq!(cart.total_price().to_string(), "99.80");
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod codec;
pub mod config;
pub mod error;
pub mod events;
pub mod line_item;
pub mod storage;
pub mod store;
pub mod view;

pub use config::{CartConfig, ConfigError};
pub use error::{CartError, Result, ValidationError};
pub use events::{CartTotals, PersistenceWarning};
pub use line_item::{LineItem, NewProduct};
pub use store::{AddOutcome, CartStore, Mutation, Receipt};
pub use view::{CartItemView, CartView, added_notification};
