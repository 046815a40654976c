//! Shopping cart module.
//!
//! The cart ledger and its persistence, promo codes, and the pricing
//! engine that turns a cart into a priced breakdown.

mod ledger;
mod line_item;
mod persistence;
pub mod pricing;
mod promo;

pub use ledger::{CartChange, CartLedger, CartObserver, CartSnapshot, SubscriptionId};
pub use line_item::{CartLineItem, MAX_QUANTITY_PER_ITEM};
#[cfg(feature = "storage")]
pub use persistence::KvCartPersistence;
pub use persistence::{
    decode_lines, encode_lines, CartPersistence, MemoryPersistence, DEFAULT_CART_KEY,
};
pub use pricing::{
    price_cart, price_with_promo, FreeShippingReason, PricedBreakdown, PricingNotice,
};
pub use promo::{normalize_code, PromoEffect, PromoRule, PromoSlot, PromoTable};
