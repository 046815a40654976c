//! Catalog file commands.

use std::path::Path;

use anyhow::{Context as _, Result};
use glow_commerce::catalog::MockCatalog;

use super::{CatalogArgs, CatalogCommand};
use crate::context::Context;

/// Run the catalog command.
pub fn run(args: CatalogArgs, ctx: &Context) -> Result<()> {
    match args.command {
        CatalogCommand::Generate { seed, count, out } => {
            let seed = seed.unwrap_or(ctx.config.catalog.seed);
            let products = MockCatalog::new(seed)
                .with_count(count)
                .with_currency(ctx.config.pricing.currency)
                .generate(chrono::Utc::now().timestamp());
            let json = serde_json::to_string_pretty(&products)?;

            match out {
                Some(path) => {
                    let path = ctx.resolve_path(Path::new(&path));
                    std::fs::write(&path, json)
                        .with_context(|| format!("Failed to write catalog: {}", path.display()))?;
                    ctx.output.success(&format!(
                        "Wrote {} products (seed {}) to {}",
                        products.len(),
                        seed,
                        path.display()
                    ));
                }
                None => println!("{}", json),
            }
        }
    }
    Ok(())
}
