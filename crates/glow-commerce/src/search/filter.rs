//! Catalog filter set.

use std::collections::BTreeSet;

use crate::catalog::{Product, MAX_RATING};
use crate::error::CommerceError;
use crate::ids::{BrandId, CategoryId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Inclusive price bounds; either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    /// Lowest accepted price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Money>,
    /// Highest accepted price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Money>,
}

impl PriceRange {
    /// Check if neither bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    fn contains(&self, price: &Money) -> bool {
        let above_min = self
            .min
            .map_or(true, |min| price.amount_cents >= min.amount_cents);
        let below_max = self
            .max
            .map_or(true, |max| price.amount_cents <= max.amount_cents);
        above_min && below_max
    }
}

/// The composable filter set applied to the catalog.
///
/// All constraints are ANDed. Empty sets, an open price range, a zero
/// minimum rating and unset flags place no constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSpec {
    /// Case-insensitive substring over name, brand and category.
    pub search: String,
    /// Accepted category ids.
    pub categories: BTreeSet<CategoryId>,
    /// Accepted brand ids.
    pub brands: BTreeSet<BrandId>,
    /// Inclusive price bounds.
    pub price_range: PriceRange,
    /// Minimum rating.
    pub min_rating: f32,
    /// Only products with stock.
    pub in_stock: bool,
    /// Only discounted products.
    pub on_sale: bool,
    /// Only new arrivals.
    pub new_arrivals: bool,
}

impl FilterSpec {
    /// Create an empty filter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search text.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Add an accepted category.
    pub fn with_category(mut self, id: impl Into<CategoryId>) -> Self {
        self.categories.insert(id.into());
        self
    }

    /// Add an accepted brand.
    pub fn with_brand(mut self, id: impl Into<BrandId>) -> Self {
        self.brands.insert(id.into());
        self
    }

    /// Set the price bounds.
    pub fn with_price_range(mut self, min: Option<Money>, max: Option<Money>) -> Self {
        self.price_range = PriceRange { min, max };
        self
    }

    /// Set the minimum rating.
    pub fn with_min_rating(mut self, rating: f32) -> Self {
        self.min_rating = rating;
        self
    }

    /// Only products with stock.
    pub fn in_stock_only(mut self) -> Self {
        self.in_stock = true;
        self
    }

    /// Only discounted products.
    pub fn on_sale_only(mut self) -> Self {
        self.on_sale = true;
        self
    }

    /// Only new arrivals.
    pub fn new_arrivals_only(mut self) -> Self {
        self.new_arrivals = true;
        self
    }

    /// Reject bounds that can never match.
    pub fn validate(&self) -> Result<(), CommerceError> {
        let PriceRange { min, max } = self.price_range;
        if min.is_some_and(|m| m.is_negative()) || max.is_some_and(|m| m.is_negative()) {
            return Err(CommerceError::invalid("price bounds must not be negative"));
        }
        if let (Some(min), Some(max)) = (min, max) {
            if min.amount_cents > max.amount_cents {
                return Err(CommerceError::invalid(format!(
                    "minimum price {} is above maximum price {}",
                    min, max
                )));
            }
        }
        if !(0.0..=MAX_RATING).contains(&self.min_rating) {
            return Err(CommerceError::invalid(format!(
                "minimum rating {} is outside 0-5",
                self.min_rating
            )));
        }
        Ok(())
    }

    /// Check a single product against every constraint.
    pub fn matches(&self, product: &Product) -> bool {
        let needle = self.search.trim().to_lowercase();
        if !needle.is_empty() {
            let hit = [&product.name, &product.brand, &product.category]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        if !self.categories.is_empty() && !self.categories.contains(&product.category_id) {
            return false;
        }
        if !self.brands.is_empty() && !self.brands.contains(&product.brand_id) {
            return false;
        }
        if !self.price_range.contains(&product.price) {
            return false;
        }
        if self.min_rating > 0.0 && product.rating < self.min_rating {
            return false;
        }
        if self.in_stock && !product.is_in_stock() {
            return false;
        }
        if self.on_sale && !product.on_sale {
            return false;
        }
        if self.new_arrivals && !product.is_new {
            return false;
        }
        true
    }

    /// Check if any constraint is set.
    pub fn has_active_filters(&self) -> bool {
        self.active_filter_count() > 0
    }

    /// Number of constraints in effect; each selected category or brand
    /// counts once.
    pub fn active_filter_count(&self) -> usize {
        let flags = [
            !self.search.trim().is_empty(),
            !self.price_range.is_unbounded(),
            self.min_rating > 0.0,
            self.in_stock,
            self.on_sale,
            self.new_arrivals,
        ];
        self.categories.len() + self.brands.len() + flags.iter().filter(|set| **set).count()
    }

    /// Reset to the empty filter set.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
