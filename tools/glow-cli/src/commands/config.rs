//! Configuration management commands.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, GlowConfig, CONFIG_FILE_NAMES};
use crate::context::Context;

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match ctx.config_path {
        Some(ref path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let config = &ctx.config;
    ctx.output.info("[store]");
    ctx.output.kv("name", &config.store.name);
    if let Some(ref website) = config.store.website {
        ctx.output.kv("website", website);
    }
    if let Some(ref email) = config.store.email {
        ctx.output.kv("email", email);
    }

    ctx.output.info("[pricing]");
    ctx.output.kv("currency", config.pricing.currency.code());
    ctx.output.kv("tax_rate", &config.pricing.tax_rate().to_string());
    ctx.output.kv(
        "free_shipping_threshold",
        &config.pricing.free_shipping_threshold().display(),
    );
    for method in &config.pricing.shipping_methods {
        let eta = method.delivery_estimate().unwrap_or_default();
        ctx.output.list_item(&format!(
            "{} - {} {} {}",
            method.id,
            method.name,
            method.price.display(),
            eta
        ));
    }
    for rule in config.pricing.promos.rules() {
        ctx.output
            .list_item(&format!("{} - {}", rule.code, rule.effect.label()));
    }

    ctx.output.info("[cart]");
    ctx.output.kv("dir", &ctx.cart_dir().display().to_string());
    ctx.output.kv("key", &config.cart.key);

    ctx.output.info("[catalog]");
    match config.catalog.path {
        Some(ref path) => ctx.output.kv("path", &path.display().to_string()),
        None => ctx
            .output
            .kv("path", &format!("(demo catalog, seed {})", config.catalog.seed)),
    }
    ctx.output.kv("page_size", &config.catalog.page_size.to_string());

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path: PathBuf = ctx.cwd.join(CONFIG_FILE_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let content = generate_default_config(&ctx.config.store.name);
    // Catch template drift before writing.
    GlowConfig::parse(&content, false)?.validate()?;
    fs::write(&config_path, content)?;

    ctx.output.success(&format!("Created: {}", config_path.display()));
    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    // Context::load already rejected an invalid config; re-check the file on
    // disk without env or flag overrides.
    if let Some(ref path) = ctx.config_path {
        let file = GlowConfig::load(path)?;
        file.validate()?;
        ctx.output.debug(&file.to_string_for(path)?);
        ctx.output.success(&format!("{} is valid", path.display()));
    } else {
        ctx.output.info("No config file found; built-in defaults are valid");
    }
    Ok(())
}
