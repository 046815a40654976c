//! Snapshot-based collection store.

use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use tracing::debug;

use crate::catalog::Product;
use crate::error::CommerceError;

/// A record with a unique key.
pub trait Keyed {
    /// Key type; must be borrowable as `str` for lookups.
    type Key: Eq + Hash + Clone + fmt::Display + Borrow<str>;

    /// The record's key.
    fn key(&self) -> &Self::Key;

    /// Check record-level invariants before the record enters a store.
    fn validate(&self) -> Result<(), CommerceError> {
        Ok(())
    }
}

/// Holds an immutable-until-replaced list of records.
///
/// Readers take an [`Arc`] snapshot; later replacements or updates never
/// mutate a snapshot that was already handed out.
#[derive(Debug, Clone)]
pub struct CollectionStore<T> {
    items: Arc<Vec<T>>,
    revision: u64,
}

impl<T: Keyed + Clone> CollectionStore<T> {
    /// Create a store from a list of records.
    ///
    /// Fails with `InvalidArgument` on duplicate keys or invalid records.
    pub fn new(items: Vec<T>) -> Result<Self, CommerceError> {
        validate_all(&items)?;
        Ok(Self {
            items: Arc::new(items),
            revision: 0,
        })
    }

    /// Create an empty store.
    pub fn empty() -> Self {
        Self {
            items: Arc::new(Vec::new()),
            revision: 0,
        }
    }

    /// Replace the whole list.
    pub fn replace(&mut self, items: Vec<T>) -> Result<(), CommerceError> {
        validate_all(&items)?;
        self.items = Arc::new(items);
        self.revision += 1;
        debug!(len = self.items.len(), revision = self.revision, "collection replaced");
        Ok(())
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Arc<Vec<T>> {
        Arc::clone(&self.items)
    }

    /// Records in source order.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Bumped on every replace or update.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Look up a record by key.
    pub fn get(&self, key: &str) -> Option<&T> {
        self.items.iter().find(|item| key_str(*item) == key)
    }

    /// Update a single record in place.
    ///
    /// Copies the list first if a snapshot is still alive.
    pub fn update(&mut self, key: &str, f: impl FnOnce(&mut T)) -> Result<(), CommerceError> {
        let index = self
            .items
            .iter()
            .position(|item| key_str(item) == key)
            .ok_or_else(|| CommerceError::NotFound(key.to_string()))?;
        let items = Arc::make_mut(&mut self.items);
        f(&mut items[index]);
        self.revision += 1;
        Ok(())
    }
}

impl<T: Keyed + Clone> Default for CollectionStore<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl CollectionStore<Product> {
    /// Set a product's wishlist flag.
    pub fn set_favorite(&mut self, id: &str, favorite: bool) -> Result<(), CommerceError> {
        self.update(id, |product| product.is_favorite = favorite)
    }

    /// Flip a product's wishlist flag, returning the new value.
    pub fn toggle_favorite(&mut self, id: &str) -> Result<bool, CommerceError> {
        let mut now_favorite = false;
        self.update(id, |product| {
            product.is_favorite = !product.is_favorite;
            now_favorite = product.is_favorite;
        })?;
        Ok(now_favorite)
    }

    /// Set a product's stock level.
    pub fn set_stock(&mut self, id: &str, stock: u32) -> Result<(), CommerceError> {
        self.update(id, |product| product.stock = stock)
    }
}

fn key_str<T: Keyed>(item: &T) -> &str {
    item.key().borrow()
}

fn validate_all<T: Keyed>(items: &[T]) -> Result<(), CommerceError> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        item.validate()?;
        if !seen.insert(item.key()) {
            return Err(CommerceError::invalid(format!(
                "duplicate key in collection: {}",
                item.key()
            )));
        }
    }
    Ok(())
}
