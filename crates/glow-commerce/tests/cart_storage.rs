//! Cart persistence through glow-cache.
#![cfg(feature = "storage")]

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use glow_cache::{Cache, KvStore};
use glow_commerce::prelude::*;

struct TempDir(PathBuf);

impl TempDir {
    fn new(name: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "glow-commerce-{}-{}-{}",
            name,
            std::process::id(),
            nanos
        ));
        std::fs::create_dir_all(&path).unwrap();
        Self(path)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

fn usd(cents: i64) -> Money {
    Money::new(cents, Currency::USD)
}

#[test]
fn test_cart_survives_reopen_from_disk() {
    let dir = TempDir::new("reopen");
    let serum = Product::new("p1", "Vitamin C Serum", usd(4999))
        .with_category("skincare", "Skincare")
        .with_original_price(usd(5999));
    let lipstick = Product::new("p2", "Matte Lipstick", usd(1800));

    {
        let persistence = KvCartPersistence::new(Cache::open_dir(&dir.0).unwrap());
        let mut cart = CartLedger::open(persistence, Currency::USD);
        cart.add_item(&serum).unwrap();
        cart.add_item(&serum).unwrap();
        cart.add_item(&lipstick).unwrap();
        cart.set_quantity("p2", 4).unwrap();
        assert_eq!(cart.last_persist_error(), None);
    }

    let persistence = KvCartPersistence::new(Cache::open_dir(&dir.0).unwrap());
    let cart = CartLedger::open(persistence, Currency::USD);
    assert_eq!(cart.items().len(), 2);
    assert_eq!(cart.item_count(), 6);
    assert_eq!(cart.subtotal(), usd(2 * 4999 + 4 * 1800));

    let line = cart.get("p1").unwrap();
    assert_eq!(line.original_unit_price, Some(usd(5999)));
    assert_eq!(line.category.as_deref(), Some("Skincare"));
}

#[test]
fn test_persisted_blob_is_a_json_array() {
    let cache = Cache::in_memory();
    let mut cart = CartLedger::open(KvCartPersistence::new(cache), Currency::USD);
    cart.add_item(&Product::new("p7", "Toner", usd(1500))).unwrap();

    let raw = cart
        .persistence()
        .cache()
        .get_raw(DEFAULT_CART_KEY)
        .unwrap()
        .unwrap();
    let value: serde_json::Value = serde_json::from_slice(&raw).unwrap();
    let lines = value.as_array().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["productId"], "p7");
    assert_eq!(lines[0]["quantity"], 1);
    assert_eq!(lines[0]["unitPrice"]["amountCents"], 1500);
}

#[test]
fn test_corrupt_blob_on_disk_resets_cart() {
    let dir = TempDir::new("corrupt");
    let cache = Cache::open_dir(&dir.0).unwrap();
    cache.store().set(DEFAULT_CART_KEY, b"[{\"productId\":").unwrap();

    let mut cart = CartLedger::open(KvCartPersistence::new(cache), Currency::USD);
    assert!(cart.is_empty());

    cart.add_item(&Product::new("p1", "Serum", usd(1000))).unwrap();
    let reopened = CartLedger::open(
        KvCartPersistence::new(Cache::open_dir(&dir.0).unwrap()),
        Currency::USD,
    );
    assert_eq!(reopened.item_count(), 1);
}

#[test]
fn test_custom_key_namespaces_carts() {
    let dir = TempDir::new("keys");
    let first = KvCartPersistence::with_key(
        Cache::open_dir(&dir.0).unwrap(),
        glow_cache::cache_key!("cart", "alice"),
    );
    let second = KvCartPersistence::with_key(
        Cache::open_dir(&dir.0).unwrap(),
        glow_cache::cache_key!("cart", "bob"),
    );

    let mut alice = CartLedger::open(first, Currency::USD);
    alice.add_item(&Product::new("p1", "Serum", usd(1000))).unwrap();

    let bob = CartLedger::open(second, Currency::USD);
    assert!(bob.is_empty());
    assert_eq!(alice.persistence().key(), "cart:alice");
}
