//! Product catalog module.
//!
//! Holds product records, the snapshot store collaborators toggle
//! favorites and stock through, and a seeded demo catalog.

mod mock;
mod product;
mod store;

pub use mock::MockCatalog;
pub use product::{Product, MAX_RATING};
pub use store::{CollectionStore, Keyed};
