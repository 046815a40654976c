//! Sort keys and page requests.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::catalog::Product;
use crate::error::CommerceError;
use serde::{Deserialize, Serialize};

/// Sort options for catalog results.
///
/// Every ordering is stable: ties keep their source order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortSpec {
    /// Bestsellers first, otherwise source order.
    #[default]
    Featured,
    /// Sort by name A-Z.
    NameAsc,
    /// Sort by name Z-A.
    NameDesc,
    /// Sort by price, low to high.
    PriceAsc,
    /// Sort by price, high to low.
    PriceDesc,
    /// Sort by highest rated.
    Rating,
    /// Sort by newest first.
    Newest,
}

impl SortSpec {
    /// All sort keys, in menu order.
    pub const ALL: [SortSpec; 7] = [
        SortSpec::Featured,
        SortSpec::NameAsc,
        SortSpec::NameDesc,
        SortSpec::PriceAsc,
        SortSpec::PriceDesc,
        SortSpec::Rating,
        SortSpec::Newest,
    ];

    /// Stable string form, e.g. `price-asc`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortSpec::Featured => "featured",
            SortSpec::NameAsc => "name-asc",
            SortSpec::NameDesc => "name-desc",
            SortSpec::PriceAsc => "price-asc",
            SortSpec::PriceDesc => "price-desc",
            SortSpec::Rating => "rating",
            SortSpec::Newest => "newest",
        }
    }

    /// Label for a sort menu.
    pub fn display_name(&self) -> &'static str {
        match self {
            SortSpec::Featured => "Featured",
            SortSpec::NameAsc => "Name: A-Z",
            SortSpec::NameDesc => "Name: Z-A",
            SortSpec::PriceAsc => "Price: Low to High",
            SortSpec::PriceDesc => "Price: High to Low",
            SortSpec::Rating => "Highest Rated",
            SortSpec::Newest => "Newest",
        }
    }

    /// Order two products under this key.
    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortSpec::Featured => b.is_bestseller.cmp(&a.is_bestseller),
            SortSpec::NameAsc => cmp_name(a, b),
            SortSpec::NameDesc => cmp_name(b, a),
            SortSpec::PriceAsc => a.price.amount_cents.cmp(&b.price.amount_cents),
            SortSpec::PriceDesc => b.price.amount_cents.cmp(&a.price.amount_cents),
            SortSpec::Rating => b.rating.total_cmp(&a.rating),
            SortSpec::Newest => b.created_at.cmp(&a.created_at),
        }
    }

    /// Sort in place. `sort_by` is stable.
    pub fn sort(&self, products: &mut [Product]) {
        products.sort_by(|a, b| self.compare(a, b));
    }
}

fn cmp_name(a: &Product, b: &Product) -> Ordering {
    a.name.to_lowercase().cmp(&b.name.to_lowercase())
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortSpec {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        SortSpec::ALL
            .into_iter()
            .find(|key| key.as_str() == wanted)
            .ok_or_else(|| CommerceError::invalid(format!("unknown sort key: {}", s)))
    }
}

/// A page request. Page numbers are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSpec {
    /// Items per page; must be positive.
    pub page_size: usize,
    /// Requested page, clamped by the query.
    pub page_number: usize,
}

impl PageSpec {
    /// Default items per page.
    pub const DEFAULT_PAGE_SIZE: usize = 12;

    /// Create a page request.
    pub fn new(page_number: usize, page_size: usize) -> Self {
        Self {
            page_size,
            page_number,
        }
    }

    /// First page with the given size.
    pub fn first(page_size: usize) -> Self {
        Self::new(1, page_size)
    }

    /// Reject a zero page size.
    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.page_size == 0 {
            return Err(CommerceError::invalid("page size must be greater than zero"));
        }
        Ok(())
    }
}

impl Default for PageSpec {
    fn default() -> Self {
        Self::first(Self::DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::{Currency, Money};

    fn product(id: &str, name: &str, cents: i64) -> Product {
        Product::new(id, name, Money::new(cents, Currency::USD))
    }

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_sort_key_round_trip() {
        for key in SortSpec::ALL {
            assert_eq!(key.as_str().parse::<SortSpec>().unwrap(), key);
        }
        assert_eq!(" Price-Desc ".parse::<SortSpec>().unwrap(), SortSpec::PriceDesc);
        assert!("cheapest".parse::<SortSpec>().is_err());
    }

    #[test]
    fn test_price_sort_is_stable() {
        let mut products = vec![
            product("a", "A", 500),
            product("b", "B", 100),
            product("c", "C", 500),
            product("d", "D", 100),
        ];
        SortSpec::PriceAsc.sort(&mut products);
        assert_eq!(ids(&products), vec!["b", "d", "a", "c"]);

        SortSpec::PriceDesc.sort(&mut products);
        assert_eq!(ids(&products), vec!["a", "c", "b", "d"]);
    }

    #[test]
    fn test_name_sort_ignores_case() {
        let mut products = vec![
            product("1", "toner", 1),
            product("2", "Blush", 1),
            product("3", "serum", 1),
        ];
        SortSpec::NameAsc.sort(&mut products);
        assert_eq!(ids(&products), vec!["2", "3", "1"]);

        SortSpec::NameDesc.sort(&mut products);
        assert_eq!(ids(&products), vec!["1", "3", "2"]);
    }

    #[test]
    fn test_featured_keeps_source_order() {
        let mut products = vec![
            product("a", "A", 1),
            product("b", "B", 1).bestseller(),
            product("c", "C", 1),
            product("d", "D", 1).bestseller(),
        ];
        SortSpec::Featured.sort(&mut products);
        assert_eq!(ids(&products), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_rating_and_newest() {
        let mut products = vec![
            product("a", "A", 1).with_rating(4.0).with_created_at(10),
            product("b", "B", 1).with_rating(4.8).with_created_at(30),
            product("c", "C", 1).with_rating(4.0).with_created_at(20),
        ];
        SortSpec::Rating.sort(&mut products);
        assert_eq!(ids(&products), vec!["b", "a", "c"]);

        SortSpec::Newest.sort(&mut products);
        assert_eq!(ids(&products), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_page_spec_validate() {
        assert!(PageSpec::default().validate().is_ok());
        assert!(matches!(
            PageSpec::new(1, 0).validate(),
            Err(CommerceError::InvalidArgument(_))
        ));
    }
}
