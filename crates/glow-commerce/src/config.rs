//! Pricing configuration.

use serde::{Deserialize, Serialize};

use crate::cart::PromoTable;
use crate::checkout::ShippingMethod;
use crate::error::CommerceError;
use crate::money::{Currency, Money, Rate};

/// Default tax rate: 8%.
pub const DEFAULT_TAX_RATE: Rate = Rate::percent(8);

/// Default free-shipping threshold in cents: subtotals above $75 ship free.
pub const DEFAULT_FREE_SHIPPING_THRESHOLD_CENTS: i64 = 7500;

/// Everything the pricing engine needs besides the cart itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingPolicy {
    /// Currency every price is expected in.
    pub currency: Currency,
    /// Tax rate in basis points.
    pub tax_rate_bps: Rate,
    /// Subtotal above which shipping is free, in minor units.
    pub free_shipping_threshold_cents: i64,
    /// Selectable shipping methods; the first is the default.
    pub shipping_methods: Vec<ShippingMethod>,
    /// Known promo codes.
    pub promos: PromoTable,
}

impl PricingPolicy {
    /// Policy with the stock tables in the given currency.
    pub fn for_currency(currency: Currency) -> Self {
        Self {
            currency,
            tax_rate_bps: DEFAULT_TAX_RATE,
            free_shipping_threshold_cents: DEFAULT_FREE_SHIPPING_THRESHOLD_CENTS,
            shipping_methods: ShippingMethod::defaults(currency),
            promos: PromoTable::default(),
        }
    }

    /// Set the tax rate.
    pub fn with_tax_rate(mut self, rate: Rate) -> Self {
        self.tax_rate_bps = rate;
        self
    }

    /// Set the free-shipping threshold.
    pub fn with_free_shipping_threshold(mut self, threshold: Money) -> Self {
        self.free_shipping_threshold_cents = threshold.amount_cents;
        self
    }

    /// Replace the promo table.
    pub fn with_promos(mut self, promos: PromoTable) -> Self {
        self.promos = promos;
        self
    }

    /// Tax rate.
    pub fn tax_rate(&self) -> Rate {
        self.tax_rate_bps
    }

    /// Free-shipping threshold.
    pub fn free_shipping_threshold(&self) -> Money {
        Money::new(self.free_shipping_threshold_cents, self.currency)
    }

    /// Find a shipping method by id.
    pub fn shipping_method(&self, id: &str) -> Result<&ShippingMethod, CommerceError> {
        self.shipping_methods
            .iter()
            .find(|method| method.id.as_str() == id)
            .ok_or_else(|| CommerceError::NotFound(format!("shipping method {}", id)))
    }

    /// The first configured shipping method.
    pub fn default_shipping_method(&self) -> Result<&ShippingMethod, CommerceError> {
        self.shipping_methods
            .first()
            .ok_or_else(|| CommerceError::invalid("no shipping methods configured"))
    }

    /// Reject settings the pricing engine cannot work with.
    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.tax_rate_bps > Rate::FULL {
            return Err(CommerceError::invalid(format!(
                "tax rate {} is above 100%",
                self.tax_rate_bps
            )));
        }
        if self.free_shipping_threshold_cents < 0 {
            return Err(CommerceError::invalid(
                "free shipping threshold must not be negative",
            ));
        }
        if self.shipping_methods.is_empty() {
            return Err(CommerceError::invalid("no shipping methods configured"));
        }
        for (i, method) in self.shipping_methods.iter().enumerate() {
            method.validate()?;
            if method.price.currency != self.currency {
                return Err(CommerceError::CurrencyMismatch {
                    expected: self.currency.code().to_string(),
                    got: method.price.currency.code().to_string(),
                });
            }
            if self.shipping_methods[..i].iter().any(|m| m.id == method.id) {
                return Err(CommerceError::invalid(format!(
                    "duplicate shipping method {}",
                    method.id
                )));
            }
        }
        self.promos.validate()
    }
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self::for_currency(Currency::USD)
    }
}
