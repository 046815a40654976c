//! Cart line items.

use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Maximum quantity allowed per line item.
pub const MAX_QUANTITY_PER_ITEM: u32 = 9999;

/// One product in the cart.
///
/// Name, prices, image and category are snapshotted when the product is
/// first added and do not follow later catalog changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    /// Product being purchased; unique within a cart.
    pub product_id: ProductId,
    /// Product name at add time.
    pub name: String,
    /// Unit price at add time.
    pub unit_price: Money,
    /// Compare-at price at add time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_unit_price: Option<Money>,
    /// Image URL.
    #[serde(default)]
    pub image: String,
    /// Quantity, at least 1.
    pub quantity: u32,
    /// Category display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Variant label (e.g., "30 ml").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
}

impl CartLineItem {
    /// Snapshot a product as a new line with quantity 1.
    pub fn from_product(product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.price,
            original_unit_price: product.original_price,
            image: product.image.clone(),
            quantity: 1,
            category: (!product.category.is_empty()).then(|| product.category.clone()),
            variant: None,
        }
    }

    /// Set the variant label.
    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    /// Currency of the unit price.
    pub fn currency(&self) -> Currency {
        self.unit_price.currency
    }

    /// Unit price times quantity.
    pub fn line_total(&self) -> Result<Money, CommerceError> {
        self.unit_price.try_multiply(i64::from(self.quantity))
    }

    /// Whether a higher compare-at price was captured.
    pub fn is_on_sale(&self) -> bool {
        self.original_unit_price
            .is_some_and(|original| original.amount_cents > self.unit_price.amount_cents)
    }

    /// Savings per unit; zero when not on sale.
    pub fn unit_savings(&self) -> Money {
        match self.original_unit_price {
            Some(original) if self.is_on_sale() => Money::new(
                original.amount_cents - self.unit_price.amount_cents,
                self.unit_price.currency,
            ),
            _ => Money::zero(self.unit_price.currency),
        }
    }

    /// `(original - unit) * quantity`; zero when not on sale.
    pub fn savings(&self) -> Result<Money, CommerceError> {
        self.unit_savings().try_multiply(i64::from(self.quantity))
    }

    /// Check the invariants a persisted line must satisfy.
    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.quantity < 1 {
            return Err(CommerceError::invalid(format!(
                "line {} has quantity {}",
                self.product_id, self.quantity
            )));
        }
        if self.unit_price.is_negative() {
            return Err(CommerceError::invalid(format!(
                "line {} has a negative unit price",
                self.product_id
            )));
        }
        if let Some(original) = self.original_unit_price {
            if original.currency != self.unit_price.currency {
                return Err(CommerceError::CurrencyMismatch {
                    expected: self.unit_price.currency.code().to_string(),
                    got: original.currency.code().to_string(),
                });
            }
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
    fn test_from_product_snapshots_fields() {
        let product = Product::new("p1", "Vitamin C Serum", usd(3999))
            .with_category("skincare", "Skincare")
            .with_original_price(usd(4999))
            .with_image("serum.jpg");
        let line = CartLineItem::from_product(&product);

        assert_eq!(line.quantity, 1);
        assert_eq!(line.unit_price, usd(3999));
        assert_eq!(line.original_unit_price, Some(usd(4999)));
        assert_eq!(line.category.as_deref(), Some("Skincare"));
        assert_eq!(line.image, "serum.jpg");
    }

    #[test]
    fn test_line_total_and_savings() {
        let mut line = CartLineItem::from_product(
            &Product::new("p1", "Serum", usd(3999)).with_original_price(usd(4999)),
        );
        line.quantity = 3;

        assert_eq!(line.line_total().unwrap(), usd(11997));
        assert_eq!(line.unit_savings(), usd(1000));
        assert_eq!(line.savings().unwrap(), usd(3000));
    }

    #[test]
    fn test_no_savings_without_sale() {
        let line = CartLineItem::from_product(&Product::new("p1", "Toner", usd(1500)));
        assert!(!line.is_on_sale());
        assert!(line.savings().unwrap().is_zero());
    }

    #[test]
    fn test_persisted_shape() {
        let line = CartLineItem::from_product(&Product::new("p1", "Toner", usd(1500)))
            .with_variant("200 ml");
        let json = serde_json::to_value(&line).unwrap();

        assert_eq!(json["productId"], "p1");
        assert_eq!(json["unitPrice"]["amountCents"], 1500);
        assert_eq!(json["variant"], "200 ml");
        assert!(json.get("originalUnitPrice").is_none());
        assert!(json.get("category").is_none());
    }

    #[test]
    fn test_validate_zero_quantity() {
        let mut line = CartLineItem::from_product(&Product::new("p1", "Toner", usd(1500)));
        line.quantity = 0;
        assert!(line.validate().is_err());
    }
}
