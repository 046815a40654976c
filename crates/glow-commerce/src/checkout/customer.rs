//! Admin customer directory.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::Keyed;
use crate::error::CommerceError;
use crate::ids::CustomerId;
use crate::money::{Currency, Money};
use crate::search::{paginate, PageSpec, SearchResults};

const DAY: i64 = 24 * 60 * 60;

/// Account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CustomerStatus {
    /// Can shop normally.
    #[default]
    Active,
    /// Dormant account.
    Inactive,
    /// Barred from ordering.
    Blocked,
}

impl CustomerStatus {
    /// Every status, in display order.
    pub const ALL: [CustomerStatus; 3] = [
        CustomerStatus::Active,
        CustomerStatus::Inactive,
        CustomerStatus::Blocked,
    ];

    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerStatus::Active => "active",
            CustomerStatus::Inactive => "inactive",
            CustomerStatus::Blocked => "blocked",
        }
    }
}

impl FromStr for CustomerStatus {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        CustomerStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| CommerceError::invalid(format!("unknown customer status: {}", s)))
    }
}

/// Account tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CustomerType {
    /// Standard retail customer.
    #[default]
    Regular,
    /// High-value customer.
    Vip,
    /// Bulk buyer.
    Wholesale,
}

impl CustomerType {
    /// Every tier, in display order.
    pub const ALL: [CustomerType; 3] = [
        CustomerType::Regular,
        CustomerType::Vip,
        CustomerType::Wholesale,
    ];

    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerType::Regular => "regular",
            CustomerType::Vip => "vip",
            CustomerType::Wholesale => "wholesale",
        }
    }
}

impl FromStr for CustomerType {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        CustomerType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| CommerceError::invalid(format!("unknown customer type: {}", s)))
    }
}

/// A customer account as seen by the admin directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    /// Unique customer identifier.
    pub id: CustomerId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email; must contain `@`.
    pub email: String,
    /// Phone number as entered, possibly empty.
    pub phone: String,
    /// Unix timestamp of sign-up.
    pub date_joined: i64,
    /// Unix timestamp of the most recent order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_order: Option<i64>,
    /// Account status.
    #[serde(default)]
    pub status: CustomerStatus,
    /// Account tier.
    #[serde(default)]
    pub customer_type: CustomerType,
    /// Lifetime number of orders.
    #[serde(default)]
    pub total_orders: u32,
    /// Lifetime spend.
    pub total_spent: Money,
    /// Loyalty points balance.
    #[serde(default)]
    pub loyalty_points: u32,
    /// Opted in to marketing email.
    #[serde(default)]
    pub marketing_consent: bool,
    /// Free-form admin notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CustomerRecord {
    /// Create an active regular customer with no orders.
    pub fn new(
        id: impl Into<CustomerId>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        date_joined: i64,
        currency: Currency,
    ) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone: String::new(),
            date_joined,
            last_order: None,
            status: CustomerStatus::default(),
            customer_type: CustomerType::default(),
            total_orders: 0,
            total_spent: Money::zero(currency),
            loyalty_points: 0,
            marketing_consent: false,
            notes: None,
        }
    }

    /// Set the phone number.
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    /// Set the account status.
    pub fn with_status(mut self, status: CustomerStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the account tier.
    pub fn with_type(mut self, customer_type: CustomerType) -> Self {
        self.customer_type = customer_type;
        self
    }

    /// Set lifetime order count and spend.
    pub fn with_orders(mut self, total_orders: u32, total_spent: Money) -> Self {
        self.total_orders = total_orders;
        self.total_spent = total_spent;
        self
    }

    /// "First Last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Lifetime spend per order; zero with no orders.
    pub fn average_order_value(&self) -> Money {
        self.total_spent.average_over(self.total_orders as usize)
    }
}

impl Keyed for CustomerRecord {
    type Key = CustomerId;

    fn key(&self) -> &CustomerId {
        &self.id
    }

    fn validate(&self) -> Result<(), CommerceError> {
        if !self.email.contains('@') {
            return Err(CommerceError::invalid(format!(
                "customer {} has an invalid email: {}",
                self.id, self.email
            )));
        }
        if self.total_spent.is_negative() {
            return Err(CommerceError::invalid(format!(
                "customer {} has negative lifetime spend",
                self.id
            )));
        }
        Ok(())
    }
}

/// Sort options for the customer directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CustomerSort {
    /// Most recently joined first.
    #[default]
    Newest,
    /// Earliest joined first.
    Oldest,
    /// Full name, A-Z.
    Name,
    /// Largest lifetime spend first.
    SpentHigh,
    /// Smallest lifetime spend first.
    SpentLow,
    /// Most orders first.
    OrdersHigh,
    /// Fewest orders first.
    OrdersLow,
}

impl CustomerSort {
    /// Every sort key, in menu order.
    pub const ALL: [CustomerSort; 7] = [
        CustomerSort::Newest,
        CustomerSort::Oldest,
        CustomerSort::Name,
        CustomerSort::SpentHigh,
        CustomerSort::SpentLow,
        CustomerSort::OrdersHigh,
        CustomerSort::OrdersLow,
    ];

    /// Stable kebab-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerSort::Newest => "newest",
            CustomerSort::Oldest => "oldest",
            CustomerSort::Name => "name",
            CustomerSort::SpentHigh => "spent-high",
            CustomerSort::SpentLow => "spent-low",
            CustomerSort::OrdersHigh => "orders-high",
            CustomerSort::OrdersLow => "orders-low",
        }
    }

    /// Sort in place; ties keep their source order.
    pub fn sort(&self, customers: &mut [CustomerRecord]) {
        match self {
            CustomerSort::Newest => customers.sort_by(|a, b| b.date_joined.cmp(&a.date_joined)),
            CustomerSort::Oldest => customers.sort_by(|a, b| a.date_joined.cmp(&b.date_joined)),
            CustomerSort::Name => {
                customers.sort_by_cached_key(|c| c.full_name().to_lowercase())
            }
            CustomerSort::SpentHigh => customers
                .sort_by(|a, b| b.total_spent.amount_cents.cmp(&a.total_spent.amount_cents)),
            CustomerSort::SpentLow => customers
                .sort_by(|a, b| a.total_spent.amount_cents.cmp(&b.total_spent.amount_cents)),
            CustomerSort::OrdersHigh => {
                customers.sort_by(|a, b| b.total_orders.cmp(&a.total_orders))
            }
            CustomerSort::OrdersLow => {
                customers.sort_by(|a, b| a.total_orders.cmp(&b.total_orders))
            }
        }
    }
}

impl FromStr for CustomerSort {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        CustomerSort::ALL
            .into_iter()
            .find(|sort| sort.as_str() == wanted)
            .ok_or_else(|| CommerceError::invalid(format!("unknown customer sort: {}", s)))
    }
}

/// Filters and sort for the customer directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerQuery {
    /// Case-insensitive substring over first name, last name, email and phone.
    pub search: String,
    /// Only customers with this status.
    pub status: Option<CustomerStatus>,
    /// Only customers of this tier.
    pub customer_type: Option<CustomerType>,
    /// Only customers who joined within this many days before `now`.
    pub joined_within_days: Option<u32>,
    /// Result order.
    pub sort: CustomerSort,
}

impl CustomerQuery {
    /// Create an unfiltered query, newest first.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search term.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Filter by status.
    pub fn with_status(mut self, status: CustomerStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Filter by tier.
    pub fn with_type(mut self, customer_type: CustomerType) -> Self {
        self.customer_type = Some(customer_type);
        self
    }

    /// Keep customers who joined in the last `days` days.
    pub fn joined_within_days(mut self, days: u32) -> Self {
        self.joined_within_days = Some(days);
        self
    }

    /// Set the sort.
    pub fn with_sort(mut self, sort: CustomerSort) -> Self {
        self.sort = sort;
        self
    }

    /// Check one customer against every filter. `now` is a unix timestamp.
    pub fn matches(&self, customer: &CustomerRecord, now: i64) -> bool {
        let needle = self.search.trim().to_lowercase();
        if !needle.is_empty() {
            let hit = customer.first_name.to_lowercase().contains(&needle)
                || customer.last_name.to_lowercase().contains(&needle)
                || customer.email.to_lowercase().contains(&needle)
                || customer.phone.contains(&needle);
            if !hit {
                return false;
            }
        }
        if self.status.is_some_and(|status| status != customer.status) {
            return false;
        }
        if self
            .customer_type
            .is_some_and(|kind| kind != customer.customer_type)
        {
            return false;
        }
        if let Some(days) = self.joined_within_days {
            let cutoff = now - i64::from(days) * DAY;
            if customer.date_joined < cutoff {
                return false;
            }
        }
        true
    }

    /// Filter, sort and paginate.
    pub fn run(
        &self,
        customers: &[CustomerRecord],
        now: i64,
        page: PageSpec,
    ) -> Result<SearchResults<CustomerRecord>, CommerceError> {
        let mut matched: Vec<CustomerRecord> = customers
            .iter()
            .filter(|customer| self.matches(customer, now))
            .cloned()
            .collect();
        self.sort.sort(&mut matched);
        let results = paginate(matched, page)?;
        debug!(
            total = results.pagination.total,
            page = results.pagination.page,
            sort = self.sort.as_str(),
            "customer query"
        );
        Ok(results)
    }
}

/// Headline numbers for the customer dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerStats {
    /// Every customer, whatever their status.
    pub total_customers: usize,
    /// Customers with an active account.
    pub active_customers: usize,
    /// Customers in the VIP tier.
    pub vip_customers: usize,
    /// Lifetime spend across every customer.
    pub total_revenue: Money,
}

impl CustomerStats {
    /// Compute stats over every customer given.
    pub fn from_customers(
        customers: &[CustomerRecord],
        currency: Currency,
    ) -> Result<Self, CommerceError> {
        Ok(Self {
            total_customers: customers.len(),
            active_customers: customers
                .iter()
                .filter(|c| c.status == CustomerStatus::Active)
                .count(),
            vip_customers: customers
                .iter()
                .filter(|c| c.customer_type == CustomerType::Vip)
                .count(),
            total_revenue: Money::try_sum(customers.iter().map(|c| &c.total_spent), currency)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CollectionStore;

    const NOW: i64 = 1_718_000_000;

    fn usd(cents: i64) -> Money {
        Money::new(cents, Currency::USD)
    }

    #[allow(clippy::too_many_arguments)]
    fn customer(
        n: u32,
        first: &str,
        last: &str,
        phone: &str,
        status: CustomerStatus,
        kind: CustomerType,
        orders: u32,
        spent: i64,
        days_ago: i64,
    ) -> CustomerRecord {
        CustomerRecord::new(
            format!("cust-{:03}", n),
            first,
            last,
            format!("{}.{}@email.com", first.to_lowercase(), last.to_lowercase()),
            NOW - days_ago * DAY,
            Currency::USD,
        )
        .with_phone(phone)
        .with_status(status)
        .with_type(kind)
        .with_orders(orders, usd(spent))
    }

    fn directory() -> Vec<CustomerRecord> {
        use CustomerStatus::*;
        use CustomerType::*;
        vec![
            customer(1, "Sarah", "Johnson", "+1 (555) 123-4567", Active, Vip, 12, 125075, 90),
            customer(2, "Michael", "Chen", "+1 (555) 234-5678", Active, Regular, 8, 67540, 20),
            customer(3, "emily", "Rodriguez", "+1 (555) 345-6789", Active, Vip, 25, 289050, 200),
            customer(4, "David", "Wilson", "+1 (555) 456-7890", Inactive, Regular, 3, 24580, 5),
            customer(5, "Jessica", "Brown", "+1 (555) 567-8901", Blocked, Wholesale, 35, 895025, 29),
        ]
    }

    fn ids(results: &SearchResults<CustomerRecord>) -> Vec<&str> {
        results.items.iter().map(|c| c.id.as_str()).collect()
    }

    fn run(query: &CustomerQuery) -> SearchResults<CustomerRecord> {
        query.run(&directory(), NOW, PageSpec::default()).unwrap()
    }

    #[test]
    fn test_search_covers_names_email_and_phone() {
        assert_eq!(ids(&run(&CustomerQuery::new().with_search("CHEN"))), vec!["cust-002"]);
        assert_eq!(
            ids(&run(&CustomerQuery::new().with_search("rodriguez@"))),
            vec!["cust-003"]
        );
        assert_eq!(ids(&run(&CustomerQuery::new().with_search("456-78"))), vec!["cust-004"]);
        assert_eq!(
            ids(&run(&CustomerQuery::new().with_search("  Emily "))),
            vec!["cust-003"]
        );
        assert_eq!(run(&CustomerQuery::new().with_search("nobody")).total(), 0);
    }

    #[test]
    fn test_status_and_type_filters() {
        let active = CustomerQuery::new().with_status(CustomerStatus::Active);
        assert_eq!(run(&active).total(), 3);

        let active_vip = active.with_type(CustomerType::Vip);
        assert_eq!(ids(&run(&active_vip)), vec!["cust-001", "cust-003"]);
    }

    #[test]
    fn test_joined_within_days_is_inclusive() {
        let recent = CustomerQuery::new().joined_within_days(29);
        assert_eq!(ids(&run(&recent)), vec!["cust-004", "cust-002", "cust-005"]);

        let edge = CustomerQuery::new().joined_within_days(20);
        assert_eq!(ids(&run(&edge)), vec!["cust-004", "cust-002"]);
    }

    #[test]
    fn test_every_sort_key() {
        let cases = [
            (CustomerSort::Newest, ["cust-004", "cust-002", "cust-005", "cust-001", "cust-003"]),
            (CustomerSort::Oldest, ["cust-003", "cust-001", "cust-005", "cust-002", "cust-004"]),
            (CustomerSort::Name, ["cust-004", "cust-003", "cust-005", "cust-002", "cust-001"]),
            (CustomerSort::SpentHigh, ["cust-005", "cust-003", "cust-001", "cust-002", "cust-004"]),
            (CustomerSort::SpentLow, ["cust-004", "cust-002", "cust-001", "cust-003", "cust-005"]),
            (CustomerSort::OrdersHigh, ["cust-005", "cust-003", "cust-001", "cust-002", "cust-004"]),
            (CustomerSort::OrdersLow, ["cust-004", "cust-002", "cust-001", "cust-003", "cust-005"]),
        ];
        for (sort, expected) in cases {
            let results = run(&CustomerQuery::new().with_sort(sort));
            assert_eq!(ids(&results), expected, "sort {}", sort.as_str());
        }
    }

    #[test]
    fn test_sort_ties_keep_source_order() {
        let mut customers = directory();
        for c in &mut customers {
            c.total_orders = 1;
        }
        let results = CustomerQuery::new()
            .with_sort(CustomerSort::OrdersHigh)
            .run(&customers, NOW, PageSpec::default())
            .unwrap();
        assert_eq!(
            ids(&results),
            vec!["cust-001", "cust-002", "cust-003", "cust-004", "cust-005"]
        );
    }

    #[test]
    fn test_pagination() {
        let results = CustomerQuery::new()
            .with_sort(CustomerSort::Oldest)
            .run(&directory(), NOW, PageSpec::new(2, 2))
            .unwrap();
        assert_eq!(ids(&results), vec!["cust-005", "cust-002"]);
        assert_eq!(results.pagination.total_pages, 3);

        let clamped = CustomerQuery::new()
            .run(&directory(), NOW, PageSpec::new(9, 2))
            .unwrap();
        assert_eq!(clamped.pagination.page, 3);
        assert_eq!(clamped.len(), 1);

        assert!(CustomerQuery::new()
            .run(&directory(), NOW, PageSpec::new(1, 0))
            .is_err());
    }

    #[test]
    fn test_average_order_value() {
        let sarah = &directory()[0];
        assert_eq!(sarah.full_name(), "Sarah Johnson");
        assert_eq!(sarah.average_order_value(), usd(10423));

        let fresh = CustomerRecord::new("c", "New", "Person", "new@email.com", NOW, Currency::USD);
        assert!(fresh.average_order_value().is_zero());
    }

    #[test]
    fn test_stats() {
        let stats = CustomerStats::from_customers(&directory(), Currency::USD).unwrap();
        assert_eq!(stats.total_customers, 5);
        assert_eq!(stats.active_customers, 3);
        assert_eq!(stats.vip_customers, 2);
        assert_eq!(stats.total_revenue, usd(125075 + 67540 + 289050 + 24580 + 895025));
    }

    #[test]
    fn test_store_rejects_invalid_records() {
        let mut bad = directory();
        bad[1].email = "michael.chen".to_string();
        assert!(CollectionStore::new(bad).is_err());

        let mut dup = directory();
        dup[4].id = CustomerId::new("cust-001");
        assert!(CollectionStore::new(dup).is_err());

        let store = CollectionStore::new(directory()).unwrap();
        assert_eq!(store.get("cust-003").unwrap().first_name, "emily");
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(&directory()[4]).unwrap();
        assert_eq!(json["customerType"], "wholesale");
        assert_eq!(json["status"], "blocked");
        assert_eq!(json["totalSpent"]["amountCents"], 895025);
        assert!(json.get("notes").is_none());
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("spent-high".parse::<CustomerSort>().unwrap(), CustomerSort::SpentHigh);
        assert_eq!(" VIP ".parse::<CustomerType>().unwrap(), CustomerType::Vip);
        assert_eq!("Blocked".parse::<CustomerStatus>().unwrap(), CustomerStatus::Blocked);
        assert!("richest".parse::<CustomerSort>().is_err());
    }
}
