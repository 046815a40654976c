//! Key-Value store wrapper with automatic serialization.

use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};

use crate::{CacheError, DirStore, KvStore, MemoryStore};

/// Type-safe cache over a [`KvStore`].
///
/// Provides automatic JSON serialization for any type that implements
/// `Serialize` and `DeserializeOwned`.
#[derive(Debug)]
pub struct Cache<S = MemoryStore> {
    store: S,
}

impl Cache<MemoryStore> {
    /// Open a fresh in-memory cache.
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }
}

impl Cache<DirStore> {
    /// Open a cache backed by a directory.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cache = Cache::open_dir("~/.glowcart")?;
    /// ```
    pub fn open_dir(root: impl Into<PathBuf>) -> Result<Self, CacheError> {
        Ok(Self::new(DirStore::open(root)?))
    }
}

impl<S: KvStore> Cache<S> {
    /// Wrap an existing store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Get the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist, and
    /// [`CacheError::SerializeError`] if the stored blob does not decode as `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.store.get(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Get the raw blob stored under a key.
    pub fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.store.get(key)
    }

    /// Set a value in the cache.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)?;
        self.store.set(key, &bytes)
    }

    /// Delete a value from the cache.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.store.delete(key)
    }

    /// Check if a key exists in the cache.
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.store.exists(key)
    }

    /// Get all keys in the cache.
    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        self.store.keys()
    }
}

/// Helper to build cache keys with namespacing.
///
/// # Example
///
/// ```rust
/// let key = glow_cache::cache_key!("cart", "default");
/// assert_eq!(key, "cart:default");
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Entry {
        id: String,
        quantity: u32,
    }

    #[test]
    fn test_typed_roundtrip() {
        let cache = Cache::in_memory();
        let entries = vec![Entry {
            id: "product-1".to_string(),
            quantity: 2,
        }];

        cache.set("cart", &entries).unwrap();
        let loaded: Option<Vec<Entry>> = cache.get("cart").unwrap();
        assert_eq!(loaded, Some(entries));
    }

    #[test]
    fn test_get_missing() {
        let cache = Cache::in_memory();
        let loaded: Option<Vec<Entry>> = cache.get("cart").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_get_undecodable() {
        let cache = Cache::in_memory();
        cache.store().set("cart", b"not json").unwrap();
        let result: Result<Option<Vec<Entry>>, _> = cache.get("cart");
        assert!(matches!(result, Err(CacheError::SerializeError(_))));
    }

    #[test]
    fn test_cache_key_macro() {
        assert_eq!(cache_key!("cart", "guest", 7), "cart:guest:7");
    }
}
