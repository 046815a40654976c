//! Shipping method types.

use crate::error::CommerceError;
use crate::ids::ShippingMethodId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// A shipping method option.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShippingMethod {
    /// Unique identifier, e.g. `standard`.
    pub id: ShippingMethodId,
    /// Display name.
    pub name: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Shipping price.
    pub price: Money,
    /// Minimum delivery days.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_delivery_days: Option<u32>,
    /// Maximum delivery days.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_delivery_days: Option<u32>,
}

impl ShippingMethod {
    /// Create a new shipping method.
    pub fn new(id: impl Into<ShippingMethodId>, name: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            price,
            min_delivery_days: None,
            max_delivery_days: None,
        }
    }

    /// Set the delivery window in days.
    pub fn with_delivery_days(mut self, min: u32, max: u32) -> Self {
        self.min_delivery_days = Some(min);
        self.max_delivery_days = Some(max);
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The stock table: standard, express and overnight.
    pub fn defaults(currency: Currency) -> Vec<ShippingMethod> {
        vec![
            ShippingMethod::new("standard", "Standard Shipping", Money::new(999, currency))
                .with_delivery_days(5, 7),
            ShippingMethod::new("express", "Express Shipping", Money::new(1999, currency))
                .with_delivery_days(2, 3),
            ShippingMethod::new("overnight", "Overnight Shipping", Money::new(2999, currency))
                .with_delivery_days(1, 1),
        ]
    }

    /// Get delivery estimate string.
    pub fn delivery_estimate(&self) -> Option<String> {
        match (self.min_delivery_days, self.max_delivery_days) {
            (Some(1), Some(1)) => Some("1 day".to_string()),
            (Some(min), Some(max)) if min == max => Some(format!("{} days", min)),
            (Some(min), Some(max)) => Some(format!("{}-{} days", min, max)),
            (Some(min), None) => Some(format!("{}+ days", min)),
            (None, Some(max)) => Some(format!("Up to {} days", max)),
            (None, None) => None,
        }
    }

    /// Check if this is free shipping.
    pub fn is_free(&self) -> bool {
        self.price.amount_cents == 0
    }

    pub(crate) fn validate(&self) -> Result<(), CommerceError> {
        if self.price.is_negative() {
            return Err(CommerceError::invalid(format!(
                "shipping method {} has a negative price",
                self.id
            )));
        }
        if let (Some(min), Some(max)) = (self.min_delivery_days, self.max_delivery_days) {
            if min > max {
                return Err(CommerceError::invalid(format!(
                    "shipping method {} has min delivery days above max",
                    self.id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_methods() {
        let methods = ShippingMethod::defaults(Currency::USD);
        let ids: Vec<&str> = methods.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["standard", "express", "overnight"]);
        assert_eq!(methods[0].price.amount_cents, 999);
        assert_eq!(methods[0].delivery_estimate(), Some("5-7 days".to_string()));
        assert_eq!(methods[2].delivery_estimate(), Some("1 day".to_string()));
    }

    #[test]
    fn test_free_shipping() {
        let method = ShippingMethod::new("pickup", "Store Pickup", Money::zero(Currency::USD));
        assert!(method.is_free());
        assert_eq!(method.delivery_estimate(), None);
    }

    #[test]
    fn test_validate() {
        let negative = ShippingMethod::new("x", "Broken", Money::new(-1, Currency::USD));
        assert!(negative.validate().is_err());

        let inverted =
            ShippingMethod::new("y", "Broken", Money::new(100, Currency::USD)).with_delivery_days(5, 2);
        assert!(inverted.validate().is_err());
    }
}
