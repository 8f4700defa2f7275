//! Integration tests for cart persistence across reloads.
//!
//! A "reload" drops the store and opens a fresh one on the same backend slot,
//! the way a page reload rebuilt the cart from local storage.

#![allow(clippy::unwrap_used)]

use nutrijoseph_cart::storage::{FileStore, KeyValueStore, MemoryStore};
use nutrijoseph_cart::{CartConfig, CartStore, NewProduct};
use nutrijoseph_core::Price;
use nutrijoseph_integration_tests::{TEST_KEY, product};
use tempfile::TempDir;

// =============================================================================
// Memory Backend
// =============================================================================

#[test]
fn test_reload_restores_items_field_for_field() {
    let store = MemoryStore::new();
    let mut cart = CartStore::open(store.clone(), TEST_KEY);
    cart.add_item(NewProduct::parse("p1", "Protein", "49.90", "p1.png").unwrap())
        .unwrap();
    cart.add_item(NewProduct::parse("p2", "Creatine", "10.00", "p2.png").unwrap())
        .unwrap();
    cart.add_item(NewProduct::parse("p1", "Protein", "49.90", "p1.png").unwrap())
        .unwrap();
    let before = cart.items();
    drop(cart);

    let reloaded = CartStore::open(store, TEST_KEY);
    assert_eq!(reloaded.items(), before);
    assert_eq!(reloaded.total_items(), 3);
    assert_eq!(reloaded.total_price(), Price::parse("109.80").unwrap());
}

#[test]
fn test_reload_after_clear_is_empty() {
    let store = MemoryStore::new();
    let mut cart = CartStore::open(store.clone(), TEST_KEY);
    cart.add_item(product("p1", "5")).unwrap();
    let _ = cart.clear();
    drop(cart);

    let reloaded = CartStore::open(store, TEST_KEY);
    assert!(reloaded.is_empty());
}

#[test]
fn test_reload_keeps_readd_position() {
    let store = MemoryStore::new();
    let mut cart = CartStore::open(store.clone(), TEST_KEY);
    for id in ["a", "b", "c", "a", "b"] {
        cart.add_item(product(id, "1")).unwrap();
    }
    let _ = cart.remove_item("b");
    drop(cart);

    let reloaded = CartStore::open(store, TEST_KEY);
    let ids: Vec<_> = reloaded
        .items()
        .iter()
        .map(|item| (item.id().to_string(), item.quantity()))
        .collect();
    assert_eq!(ids, vec![("a".to_string(), 2), ("c".to_string(), 1)]);
}

#[test]
fn test_payload_written_by_storefront_script_is_loaded() {
    let raw = r#"[
        {"id":"3","name":"Omega 3","price":59.9,"image":"images/omega.jpg","quantity":2},
        {"id":"1","name":"Whey Protein","price":189,"image":"images/whey.jpg","quantity":1}
    ]"#;
    let cart = CartStore::open(MemoryStore::with_slot(TEST_KEY, raw), TEST_KEY);

    assert_eq!(cart.len(), 2);
    assert_eq!(cart.total_items(), 3);
    assert_eq!(cart.total_price(), Price::parse("308.80").unwrap());
    assert_eq!(cart.get("3").unwrap().image_ref(), "images/omega.jpg");
}

// =============================================================================
// Malformed Payloads
// =============================================================================

#[test]
fn test_malformed_payloads_start_empty() {
    let payloads = [
        "",
        "not json",
        "[{\"id\":\"p1\"",
        "{}",
        "[1, 2, 3]",
        r#"[{"id":"p1","name":"x","price":"1","image":"","quantity":1}]"#,
        r#"[{"id":"p1","name":"x","price":1,"image":"","quantity":0}]"#,
        r#"[{"id":"p1","name":"x","price":1,"image":"","quantity":1,"extra":true}]"#,
        r#"[{"id":"p1","name":"x","price":1,"image":"","quantity":1},
            {"id":"p1","name":"x","price":1,"image":"","quantity":1}]"#,
    ];

    for raw in payloads {
        let store = MemoryStore::with_slot(TEST_KEY, raw);
        let cart = CartStore::open(store, TEST_KEY);
        assert!(cart.is_empty(), "payload should be discarded: {raw}");
        assert!(!cart.is_degraded(), "payload should not degrade: {raw}");
    }
}

#[test]
fn test_malformed_payload_is_replaced_on_next_write() {
    let store = MemoryStore::with_slot(TEST_KEY, "garbage");
    let mut cart = CartStore::open(store.clone(), TEST_KEY);
    cart.add_item(product("p1", "2.50")).unwrap();

    let saved: serde_json::Value = serde_json::from_str(&store.peek(TEST_KEY).unwrap()).unwrap();
    assert_eq!(saved.as_array().unwrap().len(), 1);
    assert_eq!(saved[0]["price"], 2.5);
}

// =============================================================================
// File Backend
// =============================================================================

#[test]
fn test_file_store_round_trip() {
    let dir = TempDir::new().unwrap();
    let config = CartConfig {
        data_dir: dir.path().to_path_buf(),
        ..CartConfig::default()
    };

    let mut cart = CartStore::from_config(FileStore::new(&config.data_dir), &config);
    cart.add_item(product("p1", "0.10")).unwrap();
    cart.add_item(product("p2", "15.75")).unwrap();
    cart.add_item(product("p1", "0.10")).unwrap();
    let before = cart.items();
    drop(cart);

    let reloaded = CartStore::from_config(FileStore::new(&config.data_dir), &config);
    assert_eq!(reloaded.items(), before);
    assert_eq!(reloaded.total_price(), Price::parse("15.95").unwrap());
}

#[test]
fn test_file_store_shares_document_with_other_keys() {
    let dir = TempDir::new().unwrap();
    let mut other = FileStore::new(dir.path());
    other.set("newsletter_email", "cliente@example.com").unwrap();

    let mut cart = CartStore::open(FileStore::new(dir.path()), TEST_KEY);
    cart.add_item(product("p1", "1")).unwrap();
    cart.purge().unwrap();

    let store = FileStore::new(dir.path());
    assert_eq!(store.get(TEST_KEY).unwrap(), None);
    assert_eq!(
        store.get("newsletter_email").unwrap().as_deref(),
        Some("cliente@example.com")
    );
}

#[test]
fn test_separate_keys_are_separate_carts() {
    let store = MemoryStore::new();
    let mut first = CartStore::open(store.clone(), "cart_a");
    let mut second = CartStore::open(store.clone(), "cart_b");
    first.add_item(product("p1", "1")).unwrap();
    second.add_item(product("p2", "2")).unwrap();
    drop(first);
    drop(second);

    let reloaded = CartStore::open(store, "cart_a");
    assert_eq!(reloaded.len(), 1);
    assert!(reloaded.get("p2").is_none());
}
