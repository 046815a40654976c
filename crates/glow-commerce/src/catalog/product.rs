//! Product records.

use crate::catalog::Keyed;
use crate::error::CommerceError;
use crate::ids::{BrandId, CategoryId, ProductId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Highest rating a product can carry.
pub const MAX_RATING: f32 = 5.0;

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Brand display name.
    pub brand: String,
    /// Brand identifier used by brand filters.
    pub brand_id: BrandId,
    /// Category display name.
    pub category: String,
    /// Category identifier used by category filters.
    pub category_id: CategoryId,
    /// Current selling price.
    pub price: Money,
    /// Compare-at price, shown struck through when the product is on sale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Money>,
    /// Image URL.
    #[serde(default)]
    pub image: String,
    /// Long description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Average rating, 0 to 5.
    #[serde(default)]
    pub rating: f32,
    /// Number of reviews behind the rating.
    #[serde(default)]
    pub review_count: u32,
    /// Units in stock.
    #[serde(default)]
    pub stock: u32,
    /// Recently added to the catalog.
    #[serde(default)]
    pub is_new: bool,
    /// Currently discounted.
    #[serde(default)]
    pub on_sale: bool,
    /// Promoted to the front of the "featured" ordering.
    #[serde(default)]
    pub is_bestseller: bool,
    /// On the shopper's wishlist.
    #[serde(default)]
    pub is_favorite: bool,
    /// Unix timestamp of creation.
    #[serde(default)]
    pub created_at: i64,
}

impl Product {
    /// Create a product with the given id, name and price.
    ///
    /// Brand and category start empty; use the `with_*` builders to fill in
    /// the rest.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            brand: String::new(),
            brand_id: BrandId::new(""),
            category: String::new(),
            category_id: CategoryId::new(""),
            price,
            original_price: None,
            image: String::new(),
            description: None,
            rating: 0.0,
            review_count: 0,
            stock: 0,
            is_new: false,
            on_sale: false,
            is_bestseller: false,
            is_favorite: false,
            created_at: 0,
        }
    }

    /// Set the brand; the id doubles as the display name.
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        let brand = brand.into();
        self.brand_id = BrandId::new(brand.clone());
        self.brand = brand;
        self
    }

    /// Set the category id and display name.
    pub fn with_category(mut self, id: impl Into<CategoryId>, name: impl Into<String>) -> Self {
        self.category_id = id.into();
        self.category = name.into();
        self
    }

    /// Mark the product as on sale with a compare-at price.
    pub fn with_original_price(mut self, original: Money) -> Self {
        self.original_price = Some(original);
        self.on_sale = original.amount_cents > self.price.amount_cents;
        self
    }

    /// Set the rating.
    pub fn with_rating(mut self, rating: f32) -> Self {
        self.rating = rating;
        self
    }

    /// Set units in stock.
    pub fn with_stock(mut self, stock: u32) -> Self {
        self.stock = stock;
        self
    }

    /// Set the creation timestamp.
    pub fn with_created_at(mut self, created_at: i64) -> Self {
        self.created_at = created_at;
        self
    }

    /// Set the image URL.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Flag as a bestseller.
    pub fn bestseller(mut self) -> Self {
        self.is_bestseller = true;
        self
    }

    /// Flag as a new arrival.
    pub fn new_arrival(mut self) -> Self {
        self.is_new = true;
        self
    }

    /// Check if any units are in stock.
    pub fn is_in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Currency of the selling price.
    pub fn currency(&self) -> Currency {
        self.price.currency
    }

    /// Rounded discount percentage when a higher compare-at price is set.
    pub fn discount_percentage(&self) -> Option<u32> {
        let original = self.original_price?;
        if original.amount_cents <= self.price.amount_cents || original.amount_cents <= 0 {
            return None;
        }
        let savings = (original.amount_cents - self.price.amount_cents) as f64;
        Some((savings / original.amount_cents as f64 * 100.0).round() as u32)
    }
}

impl Keyed for Product {
    type Key = ProductId;

    fn key(&self) -> &ProductId {
        &self.id
    }

    fn validate(&self) -> Result<(), CommerceError> {
        if self.price.is_negative() {
            return Err(CommerceError::invalid(format!(
                "product {} has a negative price",
                self.id
            )));
        }
        if let Some(original) = self.original_price {
            if original.currency != self.price.currency {
                return Err(CommerceError::CurrencyMismatch {
                    expected: self.price.currency.code().to_string(),
                    got: original.currency.code().to_string(),
                });
            }
            if original.amount_cents < self.price.amount_cents {
                return Err(CommerceError::invalid(format!(
                    "product {} has an original price below its price",
                    self.id
                )));
            }
        }
        if !(0.0..=MAX_RATING).contains(&self.rating) {
            return Err(CommerceError::invalid(format!(
                "product {} has rating {} outside 0-5",
                self.id, self.rating
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd(cents: i64) -> Money {
        Money::new(cents, Currency::USD)
    }

    #[test]
    fn test_product_builders() {
        let product = Product::new("product-1", "Vitamin C Serum", usd(4999))
            .with_brand("Luxe Beauty")
            .with_category("skincare", "Skincare")
            .with_stock(3);

        assert_eq!(product.brand_id.as_str(), "Luxe Beauty");
        assert_eq!(product.category_id.as_str(), "skincare");
        assert!(product.is_in_stock());
        assert!(product.validate().is_ok());
    }

    #[test]
    fn test_discount_percentage() {
        let product = Product::new("p", "Lip Oil", usd(2000)).with_original_price(usd(3000));
        assert!(product.on_sale);
        assert_eq!(product.discount_percentage(), Some(33));

        let plain = Product::new("q", "Toner", usd(2000));
        assert_eq!(plain.discount_percentage(), None);
    }

    #[test]
    fn test_validate_rejects_bad_records() {
        let negative = Product::new("p", "Broken", usd(-1));
        assert!(matches!(negative.validate(), Err(CommerceError::InvalidArgument(_))));

        let mut cheap_original = Product::new("p", "Broken", usd(2000));
        cheap_original.original_price = Some(usd(1000));
        assert!(cheap_original.validate().is_err());

        let rating = Product::new("p", "Broken", usd(100)).with_rating(5.5);
        assert!(rating.validate().is_err());
    }

    #[test]
    fn test_deserialize_camel_case_with_defaults() {
        let json = r#"{
            "id": "product-7",
            "name": "Setting Spray",
            "brand": "Glow Co.",
            "brandId": "Glow Co.",
            "category": "Makeup",
            "categoryId": "makeup",
            "price": {"amountCents": 1800, "currency": "USD"},
            "rating": 4.5,
            "stock": 12,
            "isBestseller": true
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.price.amount_cents, 1800);
        assert!(product.is_bestseller);
        assert!(!product.on_sale);
        assert_eq!(product.original_price, None);
    }
}
