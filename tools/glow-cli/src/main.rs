//! Glow CLI - storefront commands over the Glowcart commerce core.
//!
//! Commands:
//! - `glow products` - Browse the catalog with filters, sorting and paging
//! - `glow cart` - Show and edit the persisted cart
//! - `glow quote` - Price the cart
//! - `glow summary` - Render the order summary sent to the store
//! - `glow catalog` - Generate demo catalogs
//! - `glow config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::{CartArgs, CatalogArgs, ConfigArgs, ProductsArgs, QuoteArgs, SummaryArgs};
use context::Overrides;

/// Glow CLI - Browse, fill and price a Glowcart cart
#[derive(Parser)]
#[command(name = "glow")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Directory the cart is persisted in
    #[arg(long, global = true)]
    cart_dir: Option<String>,

    /// Catalog JSON file (a generated demo catalog when unset)
    #[arg(long, global = true)]
    catalog: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Products(ProductsArgs),

    /// Show or edit the cart
    Cart(CartArgs),

    /// Price the cart
    Quote(QuoteArgs),

    /// Render the order summary for the current cart
    Summary(SummaryArgs),

    /// Work with catalog files
    Catalog(CatalogArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let output = output::Output::new(cli.verbose, cli.json);

    let overrides = Overrides {
        cart_dir: cli.cart_dir,
        catalog: cli.catalog,
    };
    let ctx = match context::Context::load(cli.config.as_deref(), overrides, output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Products(args) => commands::products::run(args, &ctx),
        Commands::Cart(args) => commands::cart::run(args, &ctx),
        Commands::Quote(args) => commands::quote::run(args, &ctx),
        Commands::Summary(args) => commands::summary::run(args, &ctx),
        Commands::Catalog(args) => commands::catalog::run(args, &ctx),
        Commands::Config(args) => commands::config::run(args, &ctx),
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "glow=debug,glow_commerce=debug,glow_cache=debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}
