//! CLI configuration.
//!
//! Read from `glow.toml` (or JSON by extension), then environment overrides,
//! then command line flags.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glow_commerce::checkout::StoreProfile;
use glow_commerce::config::PricingPolicy;
use glow_commerce::search::PageSpec;
use glow_commerce::Rate;
use serde::{Deserialize, Serialize};

/// Config file names searched for, nearest directory first.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["glow.toml", ".glow.toml", "glow.json"];

/// Overrides the cart directory.
pub const ENV_CART_DIR: &str = "GLOW_CART_DIR";
/// Overrides the catalog file.
pub const ENV_CATALOG: &str = "GLOW_CATALOG";
/// Overrides the tax rate, in basis points.
pub const ENV_TAX_RATE_BPS: &str = "GLOW_TAX_RATE_BPS";

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlowConfig {
    /// Store details printed on order summaries.
    #[serde(default)]
    pub store: StoreProfile,

    /// Tax, shipping and promo tables.
    #[serde(default)]
    pub pricing: PricingPolicy,

    /// Cart persistence.
    #[serde(default)]
    pub cart: CartConfig,

    /// Catalog source.
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl GlowConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content, is_json(path))
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse config text as JSON or TOML.
    pub fn parse(content: &str, json: bool) -> Result<Self> {
        let config = if json {
            serde_json::from_str(content)?
        } else {
            toml::from_str(content)?
        };
        Ok(config)
    }

    /// Serialize in the format matching the file extension.
    pub fn to_string_for(&self, path: &Path) -> Result<String> {
        if is_json(path) {
            Ok(serde_json::to_string_pretty(self)?)
        } else {
            Ok(toml::to_string_pretty(self)?)
        }
    }

    /// Apply `GLOW_*` environment overrides.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(dir) = lookup(ENV_CART_DIR).filter(|v| !v.is_empty()) {
            self.cart.dir = PathBuf::from(dir);
        }
        if let Some(path) = lookup(ENV_CATALOG).filter(|v| !v.is_empty()) {
            self.catalog.path = Some(PathBuf::from(path));
        }
        if let Some(bps) = lookup(ENV_TAX_RATE_BPS).filter(|v| !v.is_empty()) {
            let bps: u32 = bps
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number of basis points", ENV_TAX_RATE_BPS))?;
            self.pricing.tax_rate_bps = Rate::from_bps(bps);
        }
        Ok(())
    }

    /// Check the pricing tables and catalog settings.
    pub fn validate(&self) -> Result<()> {
        self.pricing.validate().context("Invalid [pricing] section")?;
        PageSpec::first(self.catalog.page_size)
            .validate()
            .context("Invalid [catalog] section")?;
        if self.cart.key.trim().is_empty() {
            anyhow::bail!("cart.key must not be empty");
        }
        Ok(())
    }
}

/// Where the cart lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartConfig {
    /// Directory of the on-disk key-value store.
    #[serde(default = "default_cart_dir")]
    pub dir: PathBuf,

    /// Key the cart lines are stored under.
    #[serde(default = "default_cart_key")]
    pub key: String,
}

fn default_cart_dir() -> PathBuf {
    PathBuf::from(".glow").join("cart")
}

fn default_cart_key() -> String {
    glow_commerce::cart::DEFAULT_CART_KEY.to_string()
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            dir: default_cart_dir(),
            key: default_cart_key(),
        }
    }
}

/// Catalog source and browsing defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// JSON array of products. A demo catalog is generated when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Seed for the generated demo catalog.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Products per page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_seed() -> u64 {
    42
}

fn default_page_size() -> usize {
    PageSpec::DEFAULT_PAGE_SIZE
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: None,
            seed: default_seed(),
            page_size: default_page_size(),
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// Generate a default glow.toml config file.
pub fn generate_default_config(store_name: &str) -> String {
    format!(
        r#"# Glowcart storefront configuration

[store]
name = "{store_name}"
website = "www.glowcart.test"
email = "orders@glowcart.test"
next_steps = [
    "We'll confirm availability and pricing",
    "Payment details will be shared",
    "Your order will be processed and shipped",
]

[pricing]
currency = "USD"
# 800 basis points = 8%
tax_rate_bps = 800
free_shipping_threshold_cents = 7500

[[pricing.shipping_methods]]
id = "standard"
name = "Standard Shipping"
price = {{ amountCents = 999, currency = "USD" }}
min_delivery_days = 5
max_delivery_days = 7

[[pricing.shipping_methods]]
id = "express"
name = "Express Shipping"
price = {{ amountCents = 1999, currency = "USD" }}
min_delivery_days = 2
max_delivery_days = 3

[[pricing.shipping_methods]]
id = "overnight"
name = "Overnight Shipping"
price = {{ amountCents = 2999, currency = "USD" }}
min_delivery_days = 1
max_delivery_days = 1

[[pricing.promos]]
code = "SAVE10"
effect = {{ type = "percent-off", rate = 1000 }}

[[pricing.promos]]
code = "FREESHIP"
effect = {{ type = "free-shipping" }}

[cart]
dir = ".glow/cart"
key = "cart"

[catalog]
# path = "catalog.json"
seed = 42
page_size = 12
"#,
        store_name = store_name
    )
}
