//! Cart persistence capability.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::cart::CartLineItem;
use crate::error::CommerceError;

/// Well-known key the cart blob is stored under.
pub const DEFAULT_CART_KEY: &str = "cart";

/// Loads and saves the full set of cart lines.
///
/// `load` returns `Ok(None)` when nothing was ever saved and
/// [`CommerceError::PersistenceCorrupt`] when a blob exists but does not
/// decode.
pub trait CartPersistence {
    /// Load the saved lines.
    fn load(&self) -> Result<Option<Vec<CartLineItem>>, CommerceError>;

    /// Replace the saved lines.
    fn save(&self, items: &[CartLineItem]) -> Result<(), CommerceError>;
}

impl<P: CartPersistence + ?Sized> CartPersistence for &P {
    fn load(&self) -> Result<Option<Vec<CartLineItem>>, CommerceError> {
        (**self).load()
    }

    fn save(&self, items: &[CartLineItem]) -> Result<(), CommerceError> {
        (**self).save(items)
    }
}

/// Decode a persisted blob.
pub fn decode_lines(bytes: &[u8]) -> Result<Vec<CartLineItem>, CommerceError> {
    serde_json::from_slice(bytes).map_err(|e| CommerceError::PersistenceCorrupt(e.to_string()))
}

/// Encode lines as the persisted JSON array.
pub fn encode_lines(items: &[CartLineItem]) -> Result<Vec<u8>, CommerceError> {
    Ok(serde_json::to_vec(items)?)
}

/// In-process persistence holding the encoded blob.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    blob: Mutex<Option<Vec<u8>>>,
    saves: AtomicUsize,
}

impl MemoryPersistence {
    /// Start with nothing saved.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing blob, which need not be valid.
    pub fn with_blob(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            blob: Mutex::new(Some(bytes.into())),
            saves: AtomicUsize::new(0),
        }
    }

    /// The blob as last saved.
    pub fn blob(&self) -> Option<Vec<u8>> {
        self.blob.lock().ok().and_then(|guard| guard.clone())
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::Relaxed)
    }
}

impl CartPersistence for MemoryPersistence {
    fn load(&self) -> Result<Option<Vec<CartLineItem>>, CommerceError> {
        let guard = self
            .blob
            .lock()
            .map_err(|e| CommerceError::Persistence(format!("lock poisoned: {}", e)))?;
        guard.as_deref().map(decode_lines).transpose()
    }

    fn save(&self, items: &[CartLineItem]) -> Result<(), CommerceError> {
        let bytes = encode_lines(items)?;
        let mut guard = self
            .blob
            .lock()
            .map_err(|e| CommerceError::Persistence(format!("lock poisoned: {}", e)))?;
        *guard = Some(bytes);
        self.saves.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

#[cfg(feature = "storage")]
mod kv {
    use glow_cache::{Cache, KvStore};

    use super::{CartPersistence, DEFAULT_CART_KEY};
    use crate::cart::CartLineItem;
    use crate::error::CommerceError;

    /// Persistence on top of a [`glow_cache::Cache`].
    #[derive(Debug)]
    pub struct KvCartPersistence<S> {
        cache: Cache<S>,
        key: String,
    }

    impl<S: KvStore> KvCartPersistence<S> {
        /// Store under [`DEFAULT_CART_KEY`].
        pub fn new(cache: Cache<S>) -> Self {
            Self::with_key(cache, DEFAULT_CART_KEY)
        }

        /// Store under a custom key.
        pub fn with_key(cache: Cache<S>, key: impl Into<String>) -> Self {
            Self {
                cache,
                key: key.into(),
            }
        }

        /// The key in use.
        pub fn key(&self) -> &str {
            &self.key
        }

        /// The underlying cache.
        pub fn cache(&self) -> &Cache<S> {
            &self.cache
        }
    }

    impl<S: KvStore> CartPersistence for KvCartPersistence<S> {
        fn load(&self) -> Result<Option<Vec<CartLineItem>>, CommerceError> {
            Ok(self.cache.get::<Vec<CartLineItem>>(&self.key)?)
        }

        fn save(&self, items: &[CartLineItem]) -> Result<(), CommerceError> {
            Ok(self.cache.set(&self.key, items)?)
        }
    }

}

#[cfg(feature = "storage")]
pub use kv::KvCartPersistence;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Product;
    use crate::money::{Currency, Money};

    #[test]
    fn test_memory_round_trip() {
        let persistence = MemoryPersistence::new();
        assert_eq!(persistence.load().unwrap(), None);

        let line = CartLineItem::from_product(&Product::new(
            "p1",
            "Toner",
            Money::new(1500, Currency::USD),
        ));
        persistence.save(std::slice::from_ref(&line)).unwrap();

        assert_eq!(persistence.load().unwrap(), Some(vec![line]));
        assert_eq!(persistence.save_count(), 1);
    }

    #[test]
    fn test_memory_corrupt_blob() {
        let persistence = MemoryPersistence::with_blob("[{\"productId\": 3}]");
        assert!(matches!(
            persistence.load(),
            Err(CommerceError::PersistenceCorrupt(_))
        ));
    }
}
