//! Cart pricing.

use anyhow::Result;
use glow_commerce::cart::{price_cart, CartLineItem, FreeShippingReason, PricedBreakdown, PricingNotice};

use super::QuoteArgs;
use crate::context::Context;

/// Run the quote command.
pub fn run(args: QuoteArgs, ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart()?;
    let breakdown = quote(ctx, cart.items(), args.shipping.as_deref(), args.promo.as_deref())?;

    if ctx.output.is_json() {
        ctx.output.json(&breakdown);
        return Ok(());
    }

    if cart.is_empty() {
        ctx.output.info("Your cart is empty");
    }
    print_breakdown(ctx, &breakdown);
    Ok(())
}

/// Price the given lines with the configured policy.
pub(crate) fn quote(
    ctx: &Context,
    items: &[CartLineItem],
    shipping: Option<&str>,
    promo: Option<&str>,
) -> Result<PricedBreakdown> {
    let method = ctx.shipping_method(shipping)?;
    let breakdown = price_cart(items, method, promo, &ctx.config.pricing)?;

    for notice in &breakdown.notices {
        match notice {
            PricingNotice::InvalidPromoCode { code } => {
                ctx.output.warn(&format!("Promo code {} is not valid", code))
            }
            PricingNotice::TotalClamped { unclamped } => ctx
                .output
                .debug(&format!("total clamped from {}", unclamped.display())),
        }
    }
    Ok(breakdown)
}

fn print_breakdown(ctx: &Context, breakdown: &PricedBreakdown) {
    ctx.output.header("Order Summary");
    ctx.output.kv("Subtotal", &breakdown.subtotal.display());

    if let Some(ref promo) = breakdown.applied_promo {
        if breakdown.has_discount() {
            ctx.output.kv(
                &format!("Discount ({})", promo.code),
                &format!("-{}", breakdown.discount_amount.display()),
            );
        } else {
            ctx.output.kv("Promo", &format!("{} ({})", promo.code, promo.effect.label()));
        }
    }

    let shipping = match breakdown.free_shipping {
        Some(FreeShippingReason::Threshold) => "FREE (order threshold)".to_string(),
        Some(FreeShippingReason::Promo) => "FREE (promo)".to_string(),
        Some(FreeShippingReason::FreeOption) => "FREE".to_string(),
        None => breakdown.shipping_cost.display(),
    };
    ctx.output
        .kv(&format!("Shipping ({})", breakdown.shipping_method), &shipping);
    ctx.output.kv(
        &format!("Tax ({})", breakdown.tax_rate),
        &breakdown.tax_amount.display(),
    );
    ctx.output.kv("Total", &breakdown.total.display());

    if breakdown.free_shipping.is_none() && breakdown.amount_to_free_shipping.is_positive() {
        ctx.output.info(&format!(
            "Add {} more for free shipping",
            breakdown.amount_to_free_shipping.display()
        ));
    }
}
