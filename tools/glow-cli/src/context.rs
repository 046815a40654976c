//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use glow_cache::{Cache, DirStore};
use glow_commerce::cart::{CartLedger, KvCartPersistence};
use glow_commerce::catalog::{CollectionStore, MockCatalog, Product};
use glow_commerce::checkout::ShippingMethod;
use tracing::{debug, info};

use crate::config::{GlowConfig, CONFIG_FILE_NAMES};
use crate::output::Output;

/// The persisted cart the commands operate on.
pub type DiskCart = CartLedger<KvCartPersistence<DirStore>>;

/// Command line flags that win over the config file and environment.
#[derive(Debug, Default)]
pub struct Overrides {
    /// `--cart-dir`
    pub cart_dir: Option<String>,
    /// `--catalog`
    pub catalog: Option<String>,
}

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: GlowConfig,
    /// Config file the settings came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context: config file, then environment, then flags.
    pub fn load(config_path: Option<&str>, overrides: Overrides, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (mut config, config_path) = match config_path {
            Some(path) => {
                let path = PathBuf::from(path);
                (GlowConfig::load(&path)?, Some(path))
            }
            None => match Self::find_config(&cwd) {
                Some(path) => (GlowConfig::load(&path)?, Some(path)),
                None => (GlowConfig::default(), None),
            },
        };

        config.apply_env()?;
        if let Some(dir) = overrides.cart_dir {
            config.cart.dir = PathBuf::from(dir);
        }
        if let Some(path) = overrides.catalog {
            config.catalog.path = Some(PathBuf::from(path));
        }
        config.validate()?;

        if let Some(ref path) = config_path {
            debug!(path = %path.display(), "loaded config");
        }

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Find a config file in the directory tree.
    fn find_config(start: &Path) -> Option<PathBuf> {
        start.ancestors().find_map(|dir| {
            CONFIG_FILE_NAMES
                .iter()
                .map(|name| dir.join(name))
                .find(|path| path.is_file())
        })
    }

    /// Load the configured catalog, or generate the demo catalog.
    pub fn catalog(&self) -> Result<CollectionStore<Product>> {
        let products = match self.config.catalog.path {
            Some(ref path) => {
                let path = self.resolve_path(path);
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read catalog: {}", path.display()))?;
                let products: Vec<Product> = serde_json::from_str(&content)
                    .with_context(|| format!("Failed to parse catalog: {}", path.display()))?;
                info!(path = %path.display(), count = products.len(), "catalog loaded");
                products
            }
            None => MockCatalog::new(self.config.catalog.seed)
                .with_currency(self.config.pricing.currency)
                .generate(chrono::Utc::now().timestamp()),
        };

        CollectionStore::new(products).context("Catalog failed validation")
    }

    /// Open the persisted cart.
    pub fn open_cart(&self) -> Result<DiskCart> {
        let dir = self.cart_dir();
        let cache = Cache::open_dir(&dir)
            .with_context(|| format!("Failed to open cart store: {}", dir.display()))?;
        let persistence = KvCartPersistence::with_key(cache, self.config.cart.key.clone());
        let cart = CartLedger::open(persistence, self.config.pricing.currency);

        if let Some(err) = cart.last_persist_error() {
            self.output.warn(&format!("Cart could not be loaded, starting empty: {}", err));
        }
        self.output.debug(&format!(
            "cart {} in {} ({} items)",
            self.config.cart.key,
            dir.display(),
            cart.item_count()
        ));
        Ok(cart)
    }

    /// The named shipping method, or the default one.
    pub fn shipping_method(&self, id: Option<&str>) -> Result<&ShippingMethod> {
        let method = match id {
            Some(id) => self.config.pricing.shipping_method(id),
            None => self.config.pricing.default_shipping_method(),
        };
        method.context("Unknown shipping method")
    }

    /// Directory the cart store lives in.
    pub fn cart_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.cart.dir)
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}
