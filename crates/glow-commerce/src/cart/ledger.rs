//! The cart ledger.
//!
//! Owns the cart lines, keeps the derived aggregates in step with them,
//! saves through an injected [`CartPersistence`] after every change and
//! publishes a [`CartSnapshot`] to subscribers.

use std::collections::HashSet;
use std::fmt;
use std::sync::mpsc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cart::{CartLineItem, CartPersistence, MAX_QUANTITY_PER_ITEM};
use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};

/// What a mutation did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CartChange {
    /// A new line was created with quantity 1.
    Added { product_id: ProductId },
    /// An existing line's quantity went up.
    Incremented { product_id: ProductId, quantity: u32 },
    /// A line's quantity was set.
    QuantitySet { product_id: ProductId, quantity: u32 },
    /// A line was removed.
    Removed { product_id: ProductId },
    /// Every line was removed.
    Cleared,
    /// Nothing changed; nothing was saved or published.
    Unchanged,
}

impl CartChange {
    /// Check if the ledger was modified.
    pub fn is_changed(&self) -> bool {
        !matches!(self, CartChange::Unchanged)
    }
}

/// A consistent view of the cart after a mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    /// Lines in insertion order.
    pub items: Vec<CartLineItem>,
    /// Sum of quantities.
    pub item_count: u64,
    /// Sum of line totals.
    pub subtotal: Money,
    /// Incremented on every published change.
    pub revision: u64,
}

impl CartSnapshot {
    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    /// Find a line by product id.
    pub fn get(&self, product_id: &str) -> Option<&CartLineItem> {
        self.items.iter().find(|line| line.product_id.as_str() == product_id)
    }

    /// Total savings across on-sale lines.
    pub fn savings(&self) -> Result<Money, CommerceError> {
        self.items.iter().try_fold(Money::zero(self.subtotal.currency), |acc, line| {
            acc.try_add(&line.savings()?)
        })
    }
}

/// Receives every published snapshot.
pub trait CartObserver: Send {
    /// Called after each change, in subscription order.
    fn on_change(&mut self, snapshot: &CartSnapshot);
}

impl<F> CartObserver for F
where
    F: FnMut(&CartSnapshot) + Send,
{
    fn on_change(&mut self, snapshot: &CartSnapshot) {
        self(snapshot)
    }
}

/// Handle returned by [`CartLedger::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// The single mutable cart.
pub struct CartLedger<P> {
    persistence: P,
    currency: Currency,
    items: Vec<CartLineItem>,
    item_count: u64,
    subtotal: Money,
    revision: u64,
    observers: Vec<(SubscriptionId, Box<dyn CartObserver>)>,
    channels: Vec<mpsc::Sender<CartSnapshot>>,
    next_subscription: u64,
    last_persist_error: Option<String>,
}

impl<P: CartPersistence> CartLedger<P> {
    /// Open the ledger, loading whatever was saved.
    ///
    /// A missing blob is an empty cart. A blob that does not decode, holds a
    /// quantity below 1, repeats a product id or mixes currencies is logged
    /// and discarded; the ledger then starts empty.
    pub fn open(persistence: P, currency: Currency) -> Self {
        let mut last_persist_error = None;
        let loaded = match persistence.load() {
            Ok(Some(items)) => match check_lines(&items, currency) {
                Ok((count, subtotal)) => Some((items, count, subtotal)),
                Err(e) => {
                    warn!(error = %e, "discarding corrupt persisted cart");
                    None
                }
            },
            Ok(None) => None,
            Err(e @ CommerceError::PersistenceCorrupt(_)) => {
                warn!(error = %e, "discarding corrupt persisted cart");
                None
            }
            Err(e) => {
                warn!(error = %e, "failed to load persisted cart");
                last_persist_error = Some(e.to_string());
                None
            }
        };
        let (items, item_count, subtotal) =
            loaded.unwrap_or_else(|| (Vec::new(), 0, Money::zero(currency)));
        info!(lines = items.len(), item_count, "cart loaded");

        Self {
            persistence,
            currency,
            items,
            item_count,
            subtotal,
            revision: 0,
            observers: Vec::new(),
            channels: Vec::new(),
            next_subscription: 0,
            last_persist_error,
        }
    }

    /// Add one unit of a product.
    ///
    /// A product already in the cart has its quantity incremented, up to
    /// [`MAX_QUANTITY_PER_ITEM`]; otherwise a new line is snapshotted from
    /// the product.
    pub fn add_item(&mut self, product: &Product) -> Result<CartChange, CommerceError> {
        if product.currency() != self.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: product.currency().code().to_string(),
            });
        }

        let mut items = self.items.clone();
        let change = match items.iter_mut().find(|line| line.product_id == product.id) {
            Some(line) if line.quantity >= MAX_QUANTITY_PER_ITEM => CartChange::Unchanged,
            Some(line) => {
                line.quantity += 1;
                CartChange::Incremented {
                    product_id: product.id.clone(),
                    quantity: line.quantity,
                }
            }
            None => {
                items.push(CartLineItem::from_product(product));
                CartChange::Added {
                    product_id: product.id.clone(),
                }
            }
        };
        self.commit(items, change)
    }

    /// Remove a line. An absent id is a no-op.
    pub fn remove_item(&mut self, product_id: &str) -> Result<CartChange, CommerceError> {
        if self.get(product_id).is_none() {
            return Ok(CartChange::Unchanged);
        }
        let items = self
            .items
            .iter()
            .filter(|line| line.product_id.as_str() != product_id)
            .cloned()
            .collect();
        self.commit(
            items,
            CartChange::Removed {
                product_id: ProductId::new(product_id),
            },
        )
    }

    /// Set a line's quantity.
    ///
    /// Zero or less removes the line; values above
    /// [`MAX_QUANTITY_PER_ITEM`] are clamped. An absent id is a no-op.
    pub fn set_quantity(
        &mut self,
        product_id: &str,
        quantity: i64,
    ) -> Result<CartChange, CommerceError> {
        if quantity <= 0 {
            return self.remove_item(product_id);
        }
        let quantity = u32::try_from(quantity)
            .unwrap_or(MAX_QUANTITY_PER_ITEM)
            .min(MAX_QUANTITY_PER_ITEM);

        let mut items = self.items.clone();
        let change = match items
            .iter_mut()
            .find(|line| line.product_id.as_str() == product_id)
        {
            None => {
                debug!(product_id, "set_quantity on missing line ignored");
                CartChange::Unchanged
            }
            Some(line) if line.quantity == quantity => CartChange::Unchanged,
            Some(line) => {
                line.quantity = quantity;
                CartChange::QuantitySet {
                    product_id: line.product_id.clone(),
                    quantity,
                }
            }
        };
        self.commit(items, change)
    }

    /// Remove every line.
    pub fn clear(&mut self) -> Result<CartChange, CommerceError> {
        if self.items.is_empty() {
            return Ok(CartChange::Unchanged);
        }
        self.commit(Vec::new(), CartChange::Cleared)
    }

    /// Register an observer. It sees every snapshot published from now on.
    pub fn subscribe(&mut self, observer: impl CartObserver + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Drop an observer. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() < before
    }

    /// A receiver fed with every published snapshot.
    ///
    /// Dropping the receiver unsubscribes it on the next publish.
    pub fn channel(&mut self) -> mpsc::Receiver<CartSnapshot> {
        let (tx, rx) = mpsc::channel();
        self.channels.push(tx);
        rx
    }

    /// Current state.
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.items.clone(),
            item_count: self.item_count,
            subtotal: self.subtotal,
            revision: self.revision,
        }
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Find a line by product id.
    pub fn get(&self, product_id: &str) -> Option<&CartLineItem> {
        self.items.iter().find(|line| line.product_id.as_str() == product_id)
    }

    /// Sum of quantities.
    pub fn item_count(&self) -> u64 {
        self.item_count
    }

    /// Sum of line totals.
    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    /// Cart currency.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Revision of the last published snapshot.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The injected persistence.
    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Message of the most recent failed load or save, cleared by the next
    /// successful save.
    pub fn last_persist_error(&self) -> Option<&str> {
        self.last_persist_error.as_deref()
    }

    fn commit(
        &mut self,
        items: Vec<CartLineItem>,
        change: CartChange,
    ) -> Result<CartChange, CommerceError> {
        if !change.is_changed() {
            return Ok(change);
        }
        let (item_count, subtotal) = aggregate(&items, self.currency)?;
        self.items = items;
        self.item_count = item_count;
        self.subtotal = subtotal;
        self.revision += 1;
        debug!(?change, item_count, subtotal = %subtotal, revision = self.revision, "cart changed");

        self.persist();
        self.publish();
        Ok(change)
    }

    fn persist(&mut self) {
        match self.persistence.save(&self.items) {
            Ok(()) => self.last_persist_error = None,
            Err(e) => {
                warn!(error = %e, "failed to save cart");
                self.last_persist_error = Some(e.to_string());
            }
        }
    }

    fn publish(&mut self) {
        if self.observers.is_empty() && self.channels.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for (_, observer) in &mut self.observers {
            observer.on_change(&snapshot);
        }
        self.channels.retain(|tx| tx.send(snapshot.clone()).is_ok());
    }
}

impl<P> fmt::Debug for CartLedger<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartLedger")
            .field("currency", &self.currency)
            .field("items", &self.items)
            .field("item_count", &self.item_count)
            .field("subtotal", &self.subtotal)
            .field("revision", &self.revision)
            .field("observers", &self.observers.len())
            .finish()
    }
}

fn aggregate(items: &[CartLineItem], currency: Currency) -> Result<(u64, Money), CommerceError> {
    let count = items.iter().map(|line| u64::from(line.quantity)).sum();
    let subtotal = items
        .iter()
        .try_fold(Money::zero(currency), |acc, line| acc.try_add(&line.line_total()?))?;
    Ok((count, subtotal))
}

fn check_lines(
    items: &[CartLineItem],
    currency: Currency,
) -> Result<(u64, Money), CommerceError> {
    let mut seen = HashSet::with_capacity(items.len());
    for line in items {
        line.validate()
            .map_err(|e| CommerceError::PersistenceCorrupt(e.to_string()))?;
        if line.currency() != currency {
            return Err(CommerceError::PersistenceCorrupt(format!(
                "line {} is priced in {}, cart is {}",
                line.product_id,
                line.currency(),
                currency
            )));
        }
        if !seen.insert(&line.product_id) {
            return Err(CommerceError::PersistenceCorrupt(format!(
                "duplicate line for {}",
                line.product_id
            )));
        }
    }
    aggregate(items, currency).map_err(|e| CommerceError::PersistenceCorrupt(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{encode_lines, MemoryPersistence};
    use std::sync::{Arc, Mutex};

    fn usd(cents: i64) -> Money {
        Money::new(cents, Currency::USD)
    }

    fn serum() -> Product {
        Product::new("p1", "Vitamin C Serum", usd(4999)).with_category("skincare", "Skincare")
    }

    fn lipstick() -> Product {
        Product::new("p2", "Matte Lipstick", usd(1800))
    }

    fn ledger(persistence: &MemoryPersistence) -> CartLedger<&MemoryPersistence> {
        CartLedger::open(persistence, Currency::USD)
    }

    struct FailingPersistence;

    impl CartPersistence for FailingPersistence {
        fn load(&self) -> Result<Option<Vec<CartLineItem>>, CommerceError> {
            Ok(None)
        }

        fn save(&self, _items: &[CartLineItem]) -> Result<(), CommerceError> {
            Err(CommerceError::Persistence("disk full".to_string()))
        }
    }

    #[test]
    fn test_add_twice_increments() {
        let store = MemoryPersistence::new();
        let mut cart = ledger(&store);

        assert_eq!(
            cart.add_item(&serum()).unwrap(),
            CartChange::Added { product_id: "p1".into() }
        );
        assert_eq!(
            cart.add_item(&serum()).unwrap(),
            CartChange::Incremented { product_id: "p1".into(), quantity: 2 }
        );

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.subtotal(), usd(9998));
    }

    #[test]
    fn test_aggregates_track_mutations() {
        let store = MemoryPersistence::new();
        let mut cart = ledger(&store);
        cart.add_item(&serum()).unwrap();
        cart.add_item(&lipstick()).unwrap();
        cart.set_quantity("p2", 3).unwrap();

        assert_eq!(cart.item_count(), 4);
        assert_eq!(cart.subtotal(), usd(4999 + 3 * 1800));

        cart.remove_item("p1").unwrap();
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.subtotal(), usd(5400));
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let store = MemoryPersistence::new();
        let mut cart = ledger(&store);
        cart.add_item(&serum()).unwrap();
        let saves = store.save_count();

        assert_eq!(cart.remove_item("nope").unwrap(), CartChange::Unchanged);
        assert_eq!(store.save_count(), saves);
        assert_eq!(cart.revision(), 1);
    }

    #[test]
    fn test_set_quantity_missing_is_noop() {
        let store = MemoryPersistence::new();
        let mut cart = ledger(&store);
        assert_eq!(cart.set_quantity("nope", 4).unwrap(), CartChange::Unchanged);
        assert!(cart.is_empty());
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn test_set_quantity_zero_or_negative_removes() {
        let store = MemoryPersistence::new();
        let mut cart = ledger(&store);
        cart.add_item(&serum()).unwrap();
        cart.add_item(&lipstick()).unwrap();

        assert_eq!(
            cart.set_quantity("p1", 0).unwrap(),
            CartChange::Removed { product_id: "p1".into() }
        );
        cart.set_quantity("p2", -3).unwrap();
        assert!(cart.is_empty());
        assert!(cart.subtotal().is_zero());
    }

    #[test]
    fn test_quantity_is_clamped() {
        let store = MemoryPersistence::new();
        let mut cart = ledger(&store);
        cart.add_item(&lipstick()).unwrap();

        cart.set_quantity("p2", 50_000).unwrap();
        assert_eq!(cart.get("p2").map(|l| l.quantity), Some(MAX_QUANTITY_PER_ITEM));

        assert_eq!(cart.add_item(&lipstick()).unwrap(), CartChange::Unchanged);
        assert_eq!(cart.item_count(), u64::from(MAX_QUANTITY_PER_ITEM));
    }

    #[test]
    fn test_clear() {
        let store = MemoryPersistence::new();
        let mut cart = ledger(&store);
        assert_eq!(cart.clear().unwrap(), CartChange::Unchanged);

        cart.add_item(&serum()).unwrap();
        assert_eq!(cart.clear().unwrap(), CartChange::Cleared);
        assert!(cart.is_empty());
        assert_eq!(store.load().unwrap(), Some(Vec::new()));
    }

    #[test]
    fn test_currency_mismatch_rejected() {
        let store = MemoryPersistence::new();
        let mut cart = ledger(&store);
        let euro = Product::new("p9", "Parfum", Money::new(9000, Currency::EUR));

        assert!(matches!(
            cart.add_item(&euro),
            Err(CommerceError::CurrencyMismatch { .. })
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_persisted_state_reloads() {
        let store = MemoryPersistence::new();
        {
            let mut cart = ledger(&store);
            cart.add_item(&serum()).unwrap();
            cart.add_item(&serum()).unwrap();
            cart.add_item(&lipstick()).unwrap();
        }

        let reopened = ledger(&store);
        assert_eq!(reopened.items().len(), 2);
        assert_eq!(reopened.get("p1").map(|l| l.quantity), Some(2));
        assert_eq!(reopened.subtotal(), usd(2 * 4999 + 1800));
        assert_eq!(reopened.get("p1").and_then(|l| l.category.as_deref()), Some("Skincare"));
    }

    #[test]
    fn test_corrupt_blob_starts_empty() {
        let store = MemoryPersistence::with_blob("this is not json");
        let cart = ledger(&store);
        assert!(cart.is_empty());
        assert_eq!(cart.last_persist_error(), None);
    }

    #[test]
    fn test_invalid_lines_start_empty() {
        let mut zero = CartLineItem::from_product(&serum());
        zero.quantity = 0;
        let store = MemoryPersistence::with_blob(encode_lines(&[zero]).unwrap());
        assert!(ledger(&store).is_empty());

        let line = CartLineItem::from_product(&serum());
        let store = MemoryPersistence::with_blob(encode_lines(&[line.clone(), line]).unwrap());
        assert!(ledger(&store).is_empty());

        let euro = CartLineItem::from_product(&Product::new(
            "p9",
            "Parfum",
            Money::new(9000, Currency::EUR),
        ));
        let store = MemoryPersistence::with_blob(encode_lines(&[euro]).unwrap());
        assert!(ledger(&store).is_empty());
    }

    #[test]
    fn test_save_failure_is_reported_not_fatal() {
        let mut cart = CartLedger::open(FailingPersistence, Currency::USD);
        assert!(cart.add_item(&serum()).unwrap().is_changed());
        assert_eq!(cart.item_count(), 1);
        assert!(cart.last_persist_error().unwrap().contains("disk full"));
    }

    #[test]
    fn test_observers_see_each_change() {
        let store = MemoryPersistence::new();
        let mut cart = ledger(&store);
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        let id = cart.subscribe(move |snapshot: &CartSnapshot| {
            let lines = snapshot
                .items
                .iter()
                .map(|line| line.line_total().unwrap().amount_cents)
                .sum::<i64>();
            assert_eq!(snapshot.subtotal, usd(lines));
            sink.lock()
                .unwrap()
                .push((snapshot.revision, snapshot.item_count, snapshot.subtotal));
        });

        cart.add_item(&serum()).unwrap();
        cart.add_item(&serum()).unwrap();
        cart.add_item(&lipstick()).unwrap();
        cart.remove_item("missing").unwrap();

        assert!(cart.unsubscribe(id));
        assert!(!cart.unsubscribe(id));
        cart.clear().unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                (1, 1, usd(4999)),
                (2, 2, usd(2 * 4999)),
                (3, 3, usd(2 * 4999 + 1800)),
            ]
        );
    }

    #[test]
    fn test_channel_receives_snapshots() {
        let store = MemoryPersistence::new();
        let mut cart = ledger(&store);
        let rx = cart.channel();

        cart.add_item(&lipstick()).unwrap();
        cart.set_quantity("p2", 2).unwrap();

        let first = rx.try_recv().unwrap();
        let second = rx.try_recv().unwrap();
        assert_eq!(first.item_count, 1);
        assert_eq!(second.subtotal, usd(3600));
        assert!(rx.try_recv().is_err());

        drop(rx);
        cart.clear().unwrap();
        assert_eq!(cart.revision(), 3);
    }

    #[test]
    fn test_snapshot_savings() {
        let store = MemoryPersistence::new();
        let mut cart = ledger(&store);
        cart.add_item(&Product::new("p3", "Blush", usd(1500)).with_original_price(usd(2000)))
            .unwrap();
        cart.set_quantity("p3", 2).unwrap();

        assert_eq!(cart.snapshot().savings().unwrap(), usd(1000));
    }
}
