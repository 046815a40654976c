//! Typed key-value blob store for Glowcart.
//!
//! Values are stored as JSON blobs under string keys. Two backends ship with
//! the crate: [`MemoryStore`] for tests and embedding, and [`DirStore`], which
//! keeps one file per key inside a directory.
//!
//! # Example
//!
//! ```rust
//! use glow_cache::{Cache, MemoryStore};
//!
//! let cache = Cache::new(MemoryStore::new());
//! cache.set("cart:default", &vec![1, 2, 3]).unwrap();
//!
//! let items: Option<Vec<i32>> = cache.get("cart:default").unwrap();
//! assert_eq!(items, Some(vec![1, 2, 3]));
//! ```

mod error;
mod kv;
mod store;

pub use error::CacheError;
pub use kv::Cache;
pub use store::{DirStore, KvStore, MemoryStore};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, DirStore, KvStore, MemoryStore};
}
