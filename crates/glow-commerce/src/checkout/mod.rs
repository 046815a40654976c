//! Checkout module.
//!
//! Shipping methods, the order summary handed to the store, and the admin
//! order history and customer directory.

mod customer;
mod order;
mod shipping;
mod summary;

pub use customer::{
    CustomerQuery, CustomerRecord, CustomerSort, CustomerStats, CustomerStatus, CustomerType,
};
pub use order::{
    Customer, OrderItem, OrderQuery, OrderRecord, OrderSort, OrderStats, OrderStatus,
    PaymentStatus,
};
pub use shipping::ShippingMethod;
pub use summary::{OrderMetadata, OrderSummary, StoreProfile, SummaryLine, SummarySection};
