//! Admin order history.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::Keyed;
use crate::error::CommerceError;
use crate::ids::OrderId;
use crate::money::{Currency, Money};
use crate::search::{paginate, PageSpec, SearchResults};

const DAY: i64 = 24 * 60 * 60;

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order placed, awaiting processing.
    #[default]
    Pending,
    /// Order confirmed.
    Confirmed,
    /// Order being prepared.
    Processing,
    /// Order shipped.
    Shipped,
    /// Order delivered.
    Delivered,
    /// Order cancelled.
    Cancelled,
    /// Order refunded.
    Refunded,
}

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [OrderStatus; 7] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
        OrderStatus::Refunded,
    ];

    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Refunded => "refunded",
        }
    }

    /// Capitalized label.
    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::Refunded => "Refunded",
        }
    }

    /// Whether the order's total counts toward revenue.
    pub fn counts_as_revenue(&self) -> bool {
        !matches!(self, OrderStatus::Cancelled | OrderStatus::Refunded)
    }
}

impl FromStr for OrderStatus {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| CommerceError::invalid(format!("unknown order status: {}", s)))
    }
}

/// Payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Payment pending.
    #[default]
    Pending,
    /// Payment completed.
    Paid,
    /// Payment failed.
    Failed,
    /// Payment refunded.
    Refunded,
}

impl PaymentStatus {
    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(PaymentStatus::Pending),
            "paid" => Ok(PaymentStatus::Paid),
            "failed" => Ok(PaymentStatus::Failed),
            "refunded" => Ok(PaymentStatus::Refunded),
            _ => Err(CommerceError::invalid(format!("unknown payment status: {}", s))),
        }
    }
}

/// Customer on an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Full name as entered at checkout.
    pub name: String,
    /// Contact email.
    pub email: String,
}

/// A purchased item on a past order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Product name at time of purchase.
    pub product_name: String,
    /// Units bought.
    pub quantity: u32,
    /// Price paid per unit.
    pub unit_price: Money,
}

/// A placed order as seen by the admin history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    /// Unique order identifier.
    pub id: OrderId,
    /// Human-facing order number.
    pub order_number: String,
    /// Who placed the order.
    pub customer: Customer,
    /// Purchased lines.
    pub items: Vec<OrderItem>,
    /// Sum of line totals.
    pub subtotal: Money,
    /// Tax charged.
    pub tax: Money,
    /// Shipping charged.
    pub shipping: Money,
    /// Promo discount.
    pub discount: Money,
    /// Amount charged.
    pub total: Money,
    /// Fulfilment status.
    pub status: OrderStatus,
    /// Payment status.
    pub payment_status: PaymentStatus,
    /// Unix timestamp of placement.
    pub order_date: i64,
}

impl Keyed for OrderRecord {
    type Key = OrderId;

    fn key(&self) -> &OrderId {
        &self.id
    }
}

/// Sort options for the order history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OrderSort {
    /// Most recent first.
    #[default]
    Newest,
    /// Oldest first.
    Oldest,
    /// Largest total first.
    AmountHigh,
    /// Smallest total first.
    AmountLow,
    /// Customer name, A-Z.
    Customer,
}

impl OrderSort {
    /// Stable kebab-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSort::Newest => "newest",
            OrderSort::Oldest => "oldest",
            OrderSort::AmountHigh => "amount-high",
            OrderSort::AmountLow => "amount-low",
            OrderSort::Customer => "customer",
        }
    }

    /// Sort in place; ties keep their source order.
    pub fn sort(&self, orders: &mut [OrderRecord]) {
        match self {
            OrderSort::Newest => orders.sort_by(|a, b| b.order_date.cmp(&a.order_date)),
            OrderSort::Oldest => orders.sort_by(|a, b| a.order_date.cmp(&b.order_date)),
            OrderSort::AmountHigh => {
                orders.sort_by(|a, b| b.total.amount_cents.cmp(&a.total.amount_cents))
            }
            OrderSort::AmountLow => {
                orders.sort_by(|a, b| a.total.amount_cents.cmp(&b.total.amount_cents))
            }
            OrderSort::Customer => orders.sort_by(|a, b| {
                a.customer
                    .name
                    .to_lowercase()
                    .cmp(&b.customer.name.to_lowercase())
            }),
        }
    }
}

impl FromStr for OrderSort {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "newest" => Ok(OrderSort::Newest),
            "oldest" => Ok(OrderSort::Oldest),
            "amount-high" => Ok(OrderSort::AmountHigh),
            "amount-low" => Ok(OrderSort::AmountLow),
            "customer" => Ok(OrderSort::Customer),
            _ => Err(CommerceError::invalid(format!("unknown order sort: {}", s))),
        }
    }
}

/// Filters and sort for the order history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderQuery {
    /// Case-insensitive substring over order number, customer name and
    /// email, and item product names.
    pub search: String,
    /// Only orders with this status.
    pub status: Option<OrderStatus>,
    /// Only orders with this payment status.
    pub payment_status: Option<PaymentStatus>,
    /// Only orders placed within this many days before `now`.
    pub placed_within_days: Option<u32>,
    /// Result order.
    pub sort: OrderSort,
}

impl OrderQuery {
    /// Create an unfiltered query, newest first.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search term.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Filter by order status.
    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Filter by payment status.
    pub fn with_payment_status(mut self, status: PaymentStatus) -> Self {
        self.payment_status = Some(status);
        self
    }

    /// Keep orders placed in the last `days` days.
    pub fn placed_within_days(mut self, days: u32) -> Self {
        self.placed_within_days = Some(days);
        self
    }

    /// Set the sort.
    pub fn with_sort(mut self, sort: OrderSort) -> Self {
        self.sort = sort;
        self
    }

    /// Check one order against every filter. `now` is a unix timestamp.
    pub fn matches(&self, order: &OrderRecord, now: i64) -> bool {
        let needle = self.search.trim().to_lowercase();
        if !needle.is_empty() {
            let hit = order.order_number.to_lowercase().contains(&needle)
                || order.customer.name.to_lowercase().contains(&needle)
                || order.customer.email.to_lowercase().contains(&needle)
                || order
                    .items
                    .iter()
                    .any(|item| item.product_name.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        if self.status.is_some_and(|status| status != order.status) {
            return false;
        }
        if self
            .payment_status
            .is_some_and(|status| status != order.payment_status)
        {
            return false;
        }
        if let Some(days) = self.placed_within_days {
            let cutoff = now - i64::from(days) * DAY;
            if order.order_date < cutoff {
                return false;
            }
        }
        true
    }

    /// Filter, sort and paginate.
    pub fn run(
        &self,
        orders: &[OrderRecord],
        now: i64,
        page: PageSpec,
    ) -> Result<SearchResults<OrderRecord>, CommerceError> {
        let mut matched: Vec<OrderRecord> = orders
            .iter()
            .filter(|order| self.matches(order, now))
            .cloned()
            .collect();
        self.sort.sort(&mut matched);
        let results = paginate(matched, page)?;
        debug!(
            total = results.pagination.total,
            page = results.pagination.page,
            sort = self.sort.as_str(),
            "order query"
        );
        Ok(results)
    }
}

/// Headline numbers for the order dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStats {
    /// Every order, whatever its status.
    pub total_orders: usize,
    /// Orders still pending.
    pub pending_orders: usize,
    /// Sum of totals, excluding cancelled and refunded orders.
    pub revenue: Money,
    /// Revenue divided by the orders counted in it.
    pub average_order_value: Money,
}

impl OrderStats {
    /// Compute stats over every order given.
    pub fn from_orders(orders: &[OrderRecord], currency: Currency) -> Result<Self, CommerceError> {
        let counted: Vec<&OrderRecord> = orders
            .iter()
            .filter(|order| order.status.counts_as_revenue())
            .collect();
        let revenue = Money::try_sum(counted.iter().map(|order| &order.total), currency)?;

        let average_order_value = revenue.average_over(counted.len());

        Ok(Self {
            total_orders: orders.len(),
            pending_orders: orders
                .iter()
                .filter(|order| order.status == OrderStatus::Pending)
                .count(),
            revenue,
            average_order_value,
        })
    }
}
