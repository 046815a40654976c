//! Cart commands.

use anyhow::{bail, Result};
use dialoguer::Confirm;
use glow_commerce::cart::{CartChange, CartSnapshot};

use super::{CartArgs, CartCommand};
use crate::context::{Context, DiskCart};
use crate::output::{price_label, truncate};

/// Run the cart command.
pub fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let mut cart = ctx.open_cart()?;

    match args.command.unwrap_or(CartCommand::Show) {
        CartCommand::Show => {}
        CartCommand::Add { product_id } => add(&mut cart, &product_id, ctx)?,
        CartCommand::Remove { product_id } => {
            let change = cart.remove_item(&product_id)?;
            report(ctx, &change, &product_id);
        }
        CartCommand::Set {
            product_id,
            quantity,
        } => {
            let change = cart.set_quantity(&product_id, quantity)?;
            report(ctx, &change, &product_id);
        }
        CartCommand::Clear { yes } => {
            if cart.is_empty() {
                ctx.output.info("Cart is already empty");
            } else if confirm_clear(yes, &cart)? {
                cart.clear()?;
                ctx.output.success("Cart cleared");
            } else {
                ctx.output.warn("Clear cancelled");
                return Ok(());
            }
        }
    }

    if let Some(err) = cart.last_persist_error() {
        ctx.output.warn(&format!("Cart was not saved: {}", err));
    }

    show(ctx, &cart.snapshot());
    Ok(())
}

fn add(cart: &mut DiskCart, product_id: &str, ctx: &Context) -> Result<()> {
    let store = ctx.catalog()?;
    let Some(product) = store.get(product_id) else {
        bail!("Product not found: {}", product_id);
    };
    if !product.is_in_stock() {
        ctx.output.warn(&format!("{} is out of stock", product.name));
    }

    let change = cart.add_item(product)?;
    report(ctx, &change, product_id);
    Ok(())
}

fn confirm_clear(yes: bool, cart: &DiskCart) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    let confirmed = Confirm::new()
        .with_prompt(format!("Remove all {} items from the cart?", cart.item_count()))
        .default(false)
        .interact()?;
    Ok(confirmed)
}

fn report(ctx: &Context, change: &CartChange, product_id: &str) {
    match change {
        CartChange::Added { .. } => ctx.output.success(&format!("Added {}", product_id)),
        CartChange::Incremented { quantity, .. } => ctx
            .output
            .success(&format!("{} now x{}", product_id, quantity)),
        CartChange::QuantitySet { quantity, .. } => ctx
            .output
            .success(&format!("Set {} to x{}", product_id, quantity)),
        CartChange::Removed { .. } => ctx.output.success(&format!("Removed {}", product_id)),
        CartChange::Cleared => ctx.output.success("Cart cleared"),
        CartChange::Unchanged => ctx
            .output
            .info(&format!("Nothing changed for {}", product_id)),
    }
}

fn show(ctx: &Context, snapshot: &CartSnapshot) {
    if ctx.output.is_json() {
        ctx.output.json(snapshot);
        return;
    }

    ctx.output.header("Cart");
    if snapshot.is_empty() {
        ctx.output.info("Your cart is empty");
        return;
    }

    let widths = [12, 36, 5, 22];
    ctx.output.table_row(&["ID", "NAME", "QTY", "PRICE"], &widths);
    for line in &snapshot.items {
        let name = truncate(&line.name, widths[1]);
        let quantity = line.quantity.to_string();
        let price = price_label(&line.unit_price, line.original_unit_price.as_ref());
        ctx.output.table_row(
            &[line.product_id.as_str(), &name, &quantity, &price],
            &widths,
        );
    }

    ctx.output.kv("Items", &snapshot.item_count.to_string());
    ctx.output.kv("Subtotal", &snapshot.subtotal.display());
    if let Ok(savings) = snapshot.savings() {
        if savings.is_positive() {
            ctx.output.kv("You save", &savings.display());
        }
    }
}
