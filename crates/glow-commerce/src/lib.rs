//! Commerce computation core for Glowcart.
//!
//! - **Catalog**: products, the snapshot store, a seeded demo catalog
//! - **Search**: filters, sort keys, pagination and facets over the catalog
//! - **Cart**: the cart ledger, its persistence, promo codes and pricing
//! - **Checkout**: shipping methods, order summaries, admin order history
//!
//! # Example
//!
//! ```rust
//! use glow_commerce::prelude::*;
//!
//! let serum = Product::new("p1", "Vitamin C Serum", Money::new(4000, Currency::USD));
//!
//! let mut cart = CartLedger::open(MemoryPersistence::new(), Currency::USD);
//! cart.add_item(&serum).unwrap();
//! cart.add_item(&serum).unwrap();
//!
//! let policy = PricingPolicy::default();
//! let shipping = policy.shipping_method("standard").unwrap();
//! let breakdown = price_cart(cart.items(), shipping, None, &policy).unwrap();
//!
//! assert_eq!(breakdown.subtotal.display(), "$80.00");
//! assert!(breakdown.shipping_cost.is_zero());
//! assert_eq!(breakdown.total.display(), "$86.40");
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod search;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money, Rate};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money, Rate};

    // Catalog
    pub use crate::catalog::{CollectionStore, Keyed, MockCatalog, Product};

    // Search
    pub use crate::search::{
        facets, query, Facet, FilterSpec, PageLink, PageSpec, Pagination, SearchResults,
        SortSpec,
    };

    // Cart
    pub use crate::cart::{
        price_cart, CartChange, CartLedger, CartLineItem, CartPersistence, CartSnapshot,
        MemoryPersistence, PricedBreakdown, PricingNotice, PromoSlot, PromoTable,
        DEFAULT_CART_KEY,
    };
    #[cfg(feature = "storage")]
    pub use crate::cart::KvCartPersistence;

    // Checkout
    pub use crate::checkout::{
        CustomerQuery, CustomerRecord, CustomerStats, OrderMetadata, OrderQuery, OrderRecord,
        OrderStats, OrderSummary, ShippingMethod, StoreProfile,
    };

    pub use crate::config::PricingPolicy;
}
