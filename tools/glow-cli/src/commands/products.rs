//! Catalog browsing.

use anyhow::{anyhow, Context as _, Result};
use console::style;
use glow_commerce::search::{self, FilterSpec, PageLink, PageSpec, Pagination, SortSpec};
use glow_commerce::{Currency, Money};

use super::ProductsArgs;
use crate::context::Context;
use crate::output::{format_rating, price_label, stock_badge, truncate};

/// Page links shown under the table.
const MAX_PAGE_LINKS: usize = 7;

/// Run the products command.
pub fn run(args: ProductsArgs, ctx: &Context) -> Result<()> {
    let filter = build_filter(&args, ctx.config.pricing.currency)?;
    let sort: SortSpec = args.sort.parse()?;
    let page = PageSpec::new(
        args.page,
        args.page_size.unwrap_or(ctx.config.catalog.page_size),
    );

    let store = ctx.catalog()?;
    let mut results = search::query(store.as_slice(), &filter, sort, page)?;
    if args.facets {
        results = results.with_facets(search::facets(store.as_slice(), &filter));
    }

    if ctx.output.is_json() {
        ctx.output.json(&results);
        return Ok(());
    }

    if results.pagination.page != args.page {
        ctx.output.warn(&format!(
            "Page {} is out of range, showing page {}",
            args.page, results.pagination.page
        ));
    }

    ctx.output.header(&format!("Products ({})", sort.display_name()));
    if filter.has_active_filters() {
        ctx.output.kv("Active filters", &filter.active_filter_count().to_string());
    }

    if results.is_empty() {
        ctx.output.info("No products match these filters");
    } else {
        let widths = [12, 36, 14, 22, 6, 10];
        ctx.output.table_row(&["ID", "NAME", "BRAND", "PRICE", "RATING", "STOCK"], &widths);
        for product in &results.items {
            let name = truncate(&product.name, widths[1]);
            let price = price_label(&product.price, product.original_price.as_ref());
            let rating = format_rating(product.rating);
            let stock = stock_badge(product);
            ctx.output.table_row(
                &[product.id.as_str(), &name, &product.brand, &price, &rating, &stock],
                &widths,
            );
        }
    }

    let pagination = &results.pagination;
    ctx.output.info(&format!(
        "Showing {}-{} of {} products",
        pagination.start_item(),
        pagination.end_item(),
        pagination.total
    ));
    if pagination.total_pages > 1 {
        ctx.output.info(&page_links(pagination));
    }

    for facet in &results.facets {
        ctx.output.header(&facet.name);
        for value in &facet.values {
            let marker = if value.selected { "*" } else { " " };
            ctx.output
                .list_item(&format!("{}{} ({})", marker, value.label, value.count));
        }
    }

    Ok(())
}

/// Translate command line flags into a filter.
fn build_filter(args: &ProductsArgs, currency: Currency) -> Result<FilterSpec> {
    let mut filter = FilterSpec::new();

    if let Some(ref search) = args.search {
        filter = filter.with_search(search.as_str());
    }
    for category in &args.categories {
        filter = filter.with_category(category.as_str());
    }
    for brand in &args.brands {
        filter = filter.with_brand(brand.as_str());
    }

    let min = parse_price(args.min_price.as_deref(), currency).context("Invalid --min-price")?;
    let max = parse_price(args.max_price.as_deref(), currency).context("Invalid --max-price")?;
    if min.is_some() || max.is_some() {
        filter = filter.with_price_range(min, max);
    }

    if let Some(rating) = args.min_rating {
        filter = filter.with_min_rating(rating);
    }
    if args.in_stock {
        filter = filter.in_stock_only();
    }
    if args.on_sale {
        filter = filter.on_sale_only();
    }
    if args.new_arrivals {
        filter = filter.new_arrivals_only();
    }

    filter.validate()?;
    Ok(filter)
}

fn parse_price(input: Option<&str>, currency: Currency) -> Result<Option<Money>> {
    input
        .map(|raw| {
            Money::parse_lenient(raw, currency).ok_or_else(|| anyhow!("not a price: {}", raw))
        })
        .transpose()
}

/// Render the page window, e.g. `1 … 4 [5] 6 … 9`.
fn page_links(pagination: &Pagination) -> String {
    pagination
        .page_window(MAX_PAGE_LINKS)
        .into_iter()
        .map(|link| match link {
            PageLink::Page(n) if n == pagination.page => style(format!("[{}]", n)).bold().to_string(),
            PageLink::Page(n) => n.to_string(),
            PageLink::Ellipsis => "…".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
