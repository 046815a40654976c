//! Order summary hand-off.

use anyhow::{Context as _, Result};
use glow_commerce::checkout::{OrderMetadata, OrderSummary};
use glow_commerce::OrderId;

use super::quote::quote;
use super::SummaryArgs;
use crate::context::Context;

/// Run the summary command.
pub fn run(args: SummaryArgs, ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart()?;
    let breakdown = quote(ctx, cart.items(), args.shipping.as_deref(), args.promo.as_deref())?;

    let store = ctx.config.store.clone();
    let metadata = match args.order_id {
        Some(id) => OrderMetadata::new(OrderId::new(id), chrono::Utc::now(), store),
        None => OrderMetadata::now(store),
    };

    let summary = OrderSummary::build(cart.items(), &breakdown, &metadata)
        .context("Add something to the cart before requesting a summary")?;

    if ctx.output.is_json() {
        ctx.output.json(&summary);
    } else {
        ctx.output.raw(&summary.render_text());
    }
    Ok(())
}
