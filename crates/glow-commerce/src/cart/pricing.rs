//! Cart pricing calculations.
//!
//! [`price_cart`] is a pure function of the cart lines, the chosen shipping
//! method, an optional promo code and the [`PricingPolicy`]. Tax is charged
//! on the subtotal before any promo discount.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cart::{CartLineItem, PromoRule};
use crate::checkout::ShippingMethod;
use crate::config::PricingPolicy;
use crate::error::CommerceError;
use crate::ids::ShippingMethodId;
use crate::money::{Money, Rate};

/// Why shipping came out free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FreeShippingReason {
    /// Subtotal is above the free-shipping threshold.
    Threshold,
    /// A free-shipping promo is active.
    Promo,
    /// The selected method costs nothing.
    FreeOption,
}

/// Non-fatal conditions met while pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum PricingNotice {
    /// The entered code is not in the promo table; no discount applied.
    InvalidPromoCode { code: String },
    /// The raw total was negative and was raised to zero.
    TotalClamped { unclamped: Money },
}

/// Complete pricing breakdown for a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedBreakdown {
    /// Sum of line totals.
    pub subtotal: Money,
    /// Shipping charged.
    pub shipping_cost: Money,
    /// Tax on the pre-discount subtotal.
    pub tax_amount: Money,
    /// Promo discount.
    pub discount_amount: Money,
    /// `subtotal + shipping + tax - discount`, never below zero.
    pub total: Money,
    /// Tax rate used.
    pub tax_rate: Rate,
    /// Selected shipping method.
    pub shipping_method: ShippingMethodId,
    /// The promo that was applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_promo: Option<PromoRule>,
    /// Set when shipping is zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_shipping: Option<FreeShippingReason>,
    /// Extra subtotal needed to get above the threshold; zero once above.
    pub amount_to_free_shipping: Money,
    /// Non-fatal notices.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<PricingNotice>,
}

impl PricedBreakdown {
    /// Check if shipping was waived by the threshold.
    pub fn qualifies_for_free_shipping(&self) -> bool {
        self.free_shipping == Some(FreeShippingReason::Threshold)
    }

    /// Check if any discount applies.
    pub fn has_discount(&self) -> bool {
        self.discount_amount.is_positive()
    }

    /// Check if a notice of the given kind was raised for an invalid code.
    pub fn has_invalid_promo(&self) -> bool {
        self.notices
            .iter()
            .any(|notice| matches!(notice, PricingNotice::InvalidPromoCode { .. }))
    }
}

/// Price a cart, resolving `promo_code` against the policy's promo table.
///
/// An unknown code never fails: it adds
/// [`PricingNotice::InvalidPromoCode`] and prices without a discount.
pub fn price_cart(
    items: &[CartLineItem],
    shipping: &ShippingMethod,
    promo_code: Option<&str>,
    policy: &PricingPolicy,
) -> Result<PricedBreakdown, CommerceError> {
    let code = promo_code.map(str::trim).filter(|code| !code.is_empty());
    let (promo, notice) = match code {
        Some(code) => match policy.promos.lookup(code) {
            Ok(rule) => (Some(rule), None),
            Err(_) => (
                None,
                Some(PricingNotice::InvalidPromoCode {
                    code: code.to_string(),
                }),
            ),
        },
        None => (None, None),
    };

    let mut breakdown = price_with_promo(items, shipping, promo, policy)?;
    if let Some(notice) = notice {
        breakdown.notices.insert(0, notice);
    }
    Ok(breakdown)
}

/// Price a cart with an already resolved promo, e.g. from a
/// [`PromoSlot`](crate::cart::PromoSlot).
pub fn price_with_promo(
    items: &[CartLineItem],
    shipping: &ShippingMethod,
    promo: Option<&PromoRule>,
    policy: &PricingPolicy,
) -> Result<PricedBreakdown, CommerceError> {
    let currency = policy.currency;
    let zero = Money::zero(currency);

    let subtotal = items
        .iter()
        .try_fold(zero, |acc, line| acc.try_add(&line.line_total()?))?;
    let threshold = policy.free_shipping_threshold();

    let free_shipping = if items.is_empty() {
        None
    } else if subtotal.amount_cents > threshold.amount_cents {
        Some(FreeShippingReason::Threshold)
    } else if promo.is_some_and(|rule| rule.effect.waives_shipping()) {
        Some(FreeShippingReason::Promo)
    } else if shipping.is_free() {
        Some(FreeShippingReason::FreeOption)
    } else {
        None
    };

    let shipping_cost = if items.is_empty() || free_shipping.is_some() {
        zero
    } else {
        zero.try_add(&shipping.price)?
    };

    let tax_amount = subtotal.apply_rate(policy.tax_rate_bps)?;
    let discount_amount = match promo {
        Some(rule) => rule.effect.discount_on(&subtotal)?,
        None => zero,
    };

    let unclamped = subtotal
        .try_add(&shipping_cost)?
        .try_add(&tax_amount)?
        .try_subtract(&discount_amount)?;
    let mut notices = Vec::new();
    let total = if unclamped.is_negative() {
        notices.push(PricingNotice::TotalClamped { unclamped });
        zero
    } else {
        unclamped
    };

    // The threshold itself still pays shipping, so one more minor unit is needed.
    let amount_to_free_shipping = if subtotal.amount_cents > threshold.amount_cents {
        zero
    } else {
        threshold
            .try_subtract(&subtotal)?
            .try_add(&Money::new(1, currency))?
    };

    debug!(
        subtotal = %subtotal,
        shipping = %shipping_cost,
        tax = %tax_amount,
        discount = %discount_amount,
        total = %total,
        "cart priced"
    );

    Ok(PricedBreakdown {
        subtotal,
        shipping_cost,
        tax_amount,
        discount_amount,
        total,
        tax_rate: policy.tax_rate_bps,
        shipping_method: shipping.id.clone(),
        applied_promo: promo.cloned(),
        free_shipping,
        amount_to_free_shipping,
        notices,
    })
}
