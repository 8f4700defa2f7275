//! Persisted cart format.
//!
//! The slot holds a JSON array of objects with exactly these fields:
//!
//! ```json
//! [{"id": "p1", "name": "Protein", "price": 49.9, "image": "p1.png", "quantity": 2}]
//! ```
//!
//! Decoding is all-or-nothing: an unknown or missing field, a blank ID, an
//! invalid price, a zero quantity, or a repeated ID rejects the whole payload.

use std::collections::HashSet;

use nutrijoseph_core::{Price, ProductId};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::Number;
use thiserror::Error;

use crate::line_item::LineItem;

/// Errors produced while encoding or decoding the persisted cart.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The payload is not valid JSON of the expected shape.
    #[error("malformed cart payload: {0}")]
    Json(#[from] serde_json::Error),

    /// An entry parsed but violates a line item constraint.
    #[error("invalid cart entry at index {index}: {reason}")]
    InvalidItem {
        /// Position of the entry in the array.
        index: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// Two entries share the same product ID.
    #[error("duplicate product id in cart payload: {0}")]
    DuplicateId(String),

    /// The entries sum to more than a price can hold.
    #[error("cart total in payload overflows")]
    TotalOverflow,

    /// A price is above [`Price::MAX`] and would not read back exactly.
    #[error("price {0} cannot be encoded as a JSON number")]
    UnencodablePrice(Price),
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct StoredItem {
    id: String,
    name: String,
    price: Number,
    image: String,
    quantity: u32,
}

/// Serialize line items into the persisted JSON format.
///
/// # Errors
///
/// Returns `CodecError` if a price cannot be represented as a JSON number.
pub fn encode(items: &[LineItem]) -> Result<String, CodecError> {
    let stored = items
        .iter()
        .map(|item| {
            Ok(StoredItem {
                id: item.id().to_string(),
                name: item.name().to_string(),
                price: price_to_number(item.unit_price())?,
                image: item.image_ref().to_string(),
                quantity: item.quantity(),
            })
        })
        .collect::<Result<Vec<_>, CodecError>>()?;

    Ok(serde_json::to_string(&stored)?)
}

/// Parse the persisted JSON format back into line items, preserving order.
///
/// # Errors
///
/// Returns `CodecError` if the payload is malformed or any entry is invalid.
pub fn decode(raw: &str) -> Result<Vec<LineItem>, CodecError> {
    decode_with_total(raw).map(|(items, _)| items)
}

/// Like [`decode`], also returning the cart total.
pub(crate) fn decode_with_total(raw: &str) -> Result<(Vec<LineItem>, Price), CodecError> {
    let stored: Vec<StoredItem> = serde_json::from_str(raw)?;
    let mut seen = HashSet::with_capacity(stored.len());
    let mut items = Vec::with_capacity(stored.len());
    let mut total = Price::ZERO;

    for (index, entry) in stored.into_iter().enumerate() {
        let invalid = |reason: String| CodecError::InvalidItem { index, reason };

        let id = ProductId::parse(&entry.id).map_err(|e| invalid(e.to_string()))?;
        let unit_price = Price::parse(&entry.price.to_string()).map_err(|e| invalid(e.to_string()))?;

        if !seen.insert(id.clone()) {
            return Err(CodecError::DuplicateId(id.into_inner()));
        }

        let item = LineItem::restore(id, entry.name, unit_price, entry.image, entry.quantity)
            .ok_or_else(|| invalid("quantity must be at least 1 and the line total must fit".to_string()))?;
        total = total
            .checked_add(item.line_total())
            .ok_or(CodecError::TotalOverflow)?;
        items.push(item);
    }

    Ok((items, total))
}

/// Whole amounts are written as integers, others as the shortest float
/// representation. Up to [`Price::MAX`] that text reads back to the same
/// two-decimal value.
fn price_to_number(price: Price) -> Result<Number, CodecError> {
    if price > Price::MAX {
        return Err(CodecError::UnencodablePrice(price));
    }

    let minor = price.minor_units();
    if minor % 100 == 0 {
        return Ok(Number::from(minor / 100));
    }

    price
        .to_decimal()
        .to_f64()
        .and_then(Number::from_f64)
        .ok_or(CodecError::UnencodablePrice(price))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(id: &str, price: u64, quantity: u32) -> LineItem {
        LineItem::restore(
            ProductId::parse(id).unwrap(),
            format!("Product {id}"),
            Price::from_minor_units(price),
            format!("{id}.png"),
            quantity,
        )
        .unwrap()
    }

    #[test]
    fn test_encode_field_names() {
        let raw = encode(&[item("p1", 4990, 2)]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{
                "id": "p1",
                "name": "Product p1",
                "price": 49.9,
                "image": "p1.png",
                "quantity": 2
            }])
        );
    }

    #[test]
    fn test_encode_whole_price_as_integer() {
        let raw = encode(&[item("p2", 1000, 1)]).unwrap();
        assert!(raw.contains("\"price\":10,"));
    }

    #[test]
    fn test_encode_empty() {
        assert_eq!(encode(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_decode_preserves_order_and_fields() {
        let items = vec![item("p2", 1000, 1), item("p1", 4990, 3), item("p3", 5, 1)];
        let decoded = decode(&encode(&items).unwrap()).unwrap();
        assert_eq!(decoded, items);
    }

    #[test]
    fn test_max_price_reads_back_exactly() {
        let items = vec![
            item("max", Price::MAX.minor_units(), 1),
            item("odd", 123_456_789_012_345, 1),
            item("cent", 999_999_999_999_901, 1),
        ];
        let raw = encode(&items).unwrap();
        assert!(raw.contains("\"price\":9999999999999.99,"));
        assert_eq!(decode(&raw).unwrap(), items);
    }

    #[test]
    fn test_encode_rejects_price_above_max() {
        let over = item("big", Price::MAX.minor_units() + 1, 1);
        assert!(matches!(
            encode(&[over]),
            Err(CodecError::UnencodablePrice(_))
        ));
    }

    #[test]
    fn test_decode_rejects_price_above_max() {
        let raw = r#"[{"id":"p1","name":"x","price":123456789012345.67,"image":"","quantity":1}]"#;
        assert!(matches!(
            decode(raw),
            Err(CodecError::InvalidItem { index: 0, .. })
        ));
    }

    #[test]
    fn test_decode_rejects_overflowing_total() {
        let line = |id: &str| {
            format!(
                r#"{{"id":"{id}","name":"x","price":9999999999999.99,"image":"","quantity":10000}}"#
            )
        };
        let raw = format!("[{},{}]", line("a"), line("b"));
        assert!(matches!(decode(&raw), Err(CodecError::TotalOverflow)));
    }

    #[test]
    fn test_decode_accepts_storefront_payload() {
        let raw = r#"[{"id":"1","name":"Whey Gold","price":189.9,"image":"img/whey.jpg","quantity":1}]"#;
        let items = decode(raw).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items.first().unwrap().unit_price().minor_units(), 18_990);
    }

    #[test]
    fn test_decode_rejects_truncated() {
        assert!(matches!(
            decode(r#"[{"id":"p1","name":"#),
            Err(CodecError::Json(_))
        ));
    }

    #[test]
    fn test_decode_rejects_wrong_shape() {
        assert!(decode(r#"{"id":"p1"}"#).is_err());
        assert!(decode("null").is_err());
    }

    #[test]
    fn test_decode_rejects_missing_field() {
        let raw = r#"[{"id":"p1","name":"x","price":1,"quantity":1}]"#;
        assert!(matches!(decode(raw), Err(CodecError::Json(_))));
    }

    #[test]
    fn test_decode_rejects_unknown_field() {
        let raw = r#"[{"id":"p1","name":"x","price":1,"image":"","quantity":1,"sku":"A"}]"#;
        assert!(matches!(decode(raw), Err(CodecError::Json(_))));
    }

    #[test]
    fn test_decode_rejects_invalid_entries() {
        let zero_qty = r#"[{"id":"p1","name":"x","price":1,"image":"","quantity":0}]"#;
        assert!(matches!(
            decode(zero_qty),
            Err(CodecError::InvalidItem { index: 0, .. })
        ));

        let negative = r#"[{"id":"p1","name":"x","price":-1,"image":"","quantity":1}]"#;
        assert!(matches!(
            decode(negative),
            Err(CodecError::InvalidItem { .. })
        ));

        let blank_id = r#"[{"id":"","name":"x","price":1,"image":"","quantity":1}]"#;
        assert!(matches!(
            decode(blank_id),
            Err(CodecError::InvalidItem { .. })
        ));

        let fractional_qty = r#"[{"id":"p1","name":"x","price":1,"image":"","quantity":1.5}]"#;
        assert!(decode(fractional_qty).is_err());
    }

    #[test]
    fn test_decode_rejects_price_as_string() {
        let raw = r#"[{"id":"p1","name":"x","price":"1.00","image":"","quantity":1}]"#;
        assert!(matches!(decode(raw), Err(CodecError::Json(_))));
    }

    #[test]
    fn test_decode_rejects_duplicates() {
        let raw = r#"[
            {"id":"p1","name":"x","price":1,"image":"","quantity":1},
            {"id":"p1","name":"y","price":2,"image":"","quantity":1}
        ]"#;
        assert!(matches!(decode(raw), Err(CodecError::DuplicateId(id)) if id == "p1"));
    }
}
