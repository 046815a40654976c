//! CLI command implementations.

pub mod cart;
pub mod catalog;
pub mod config;
pub mod products;
pub mod quote;
pub mod summary;

use clap::{Args, Subcommand};

/// Arguments for the products command.
#[derive(Args)]
pub struct ProductsArgs {
    /// Free-text search over name, brand and category.
    #[arg(short, long)]
    pub search: Option<String>,

    /// Category id to include (repeatable).
    #[arg(long = "category")]
    pub categories: Vec<String>,

    /// Brand to include (repeatable).
    #[arg(long = "brand")]
    pub brands: Vec<String>,

    /// Lowest price, e.g. 19.99.
    #[arg(long)]
    pub min_price: Option<String>,

    /// Highest price, e.g. 49.99.
    #[arg(long)]
    pub max_price: Option<String>,

    /// Minimum rating, 0 to 5.
    #[arg(long)]
    pub min_rating: Option<f32>,

    /// Only products in stock.
    #[arg(long)]
    pub in_stock: bool,

    /// Only discounted products.
    #[arg(long)]
    pub on_sale: bool,

    /// Only new arrivals.
    #[arg(long = "new")]
    pub new_arrivals: bool,

    /// Sort order: featured, name-asc, name-desc, price-asc, price-desc, rating, newest.
    #[arg(long, default_value = "featured")]
    pub sort: String,

    /// Page number, starting at 1.
    #[arg(short, long, default_value = "1")]
    pub page: usize,

    /// Products per page (default from config).
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Show category and brand counts.
    #[arg(long)]
    pub facets: bool,
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show the cart.
    Show,
    /// Add one unit of a product.
    Add {
        /// Product id.
        product_id: String,
    },
    /// Remove a product line.
    Remove {
        /// Product id.
        product_id: String,
    },
    /// Set the quantity of a line; zero or less removes it.
    Set {
        /// Product id.
        product_id: String,
        /// New quantity.
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart.
    Clear {
        /// Skip confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the quote command.
#[derive(Args)]
pub struct QuoteArgs {
    /// Shipping method id (default: first configured method).
    #[arg(short, long)]
    pub shipping: Option<String>,

    /// Promo code.
    #[arg(long)]
    pub promo: Option<String>,
}

/// Arguments for the summary command.
#[derive(Args)]
pub struct SummaryArgs {
    /// Shipping method id (default: first configured method).
    #[arg(short, long)]
    pub shipping: Option<String>,

    /// Promo code.
    #[arg(long)]
    pub promo: Option<String>,

    /// Order id (default: derived from the current time).
    #[arg(long)]
    pub order_id: Option<String>,
}

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommand,
}

#[derive(Subcommand)]
pub enum CatalogCommand {
    /// Generate a demo catalog as JSON.
    Generate {
        /// Seed (default from config).
        #[arg(long)]
        seed: Option<u64>,

        /// Number of products.
        #[arg(long, default_value = "48")]
        count: usize,

        /// Output file (default: stdout).
        #[arg(short, long)]
        out: Option<String>,
    },
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the configuration.
    Validate,
}
