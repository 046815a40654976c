//! The filter, sort and paginate pipeline.

use tracing::debug;

use crate::catalog::Product;
use crate::error::CommerceError;
use crate::search::{Facet, FilterSpec, PageSpec, Pagination, SearchResults, SortSpec};

/// Run a catalog query over the full collection.
///
/// Filtering sees every product, sorting runs on the filtered set, and the
/// page is sliced last. An out-of-range page is clamped; the returned
/// [`Pagination`] carries the page actually served.
pub fn query(
    products: &[Product],
    filter: &FilterSpec,
    sort: SortSpec,
    page: PageSpec,
) -> Result<SearchResults<Product>, CommerceError> {
    filter.validate()?;
    page.validate()?;

    let mut matched: Vec<Product> = products
        .iter()
        .filter(|product| filter.matches(product))
        .cloned()
        .collect();
    sort.sort(&mut matched);

    let results = paginate(matched, page)?;
    debug!(
        total = results.pagination.total,
        page = results.pagination.page,
        total_pages = results.pagination.total_pages,
        sort = sort.as_str(),
        filters = filter.active_filter_count(),
        "catalog query"
    );
    Ok(results)
}

/// Slice an already filtered and sorted list into one page.
pub fn paginate<T>(items: Vec<T>, page: PageSpec) -> Result<SearchResults<T>, CommerceError> {
    page.validate()?;
    let pagination = Pagination::new(page, items.len());
    let range = pagination.range();
    let items = items
        .into_iter()
        .skip(range.start)
        .take(range.end - range.start)
        .collect();
    Ok(SearchResults::new(items, pagination))
}

/// Category and brand counts over the whole collection.
///
/// Counts ignore the active filter so a sidebar can show every option;
/// the filter only decides which values are marked selected.
pub fn facets(products: &[Product], filter: &FilterSpec) -> Vec<Facet> {
    let mut categories = Facet::new("Category", "categoryId");
    let mut brands = Facet::new("Brand", "brandId");
    for product in products {
        categories.bump(
            product.category_id.as_str(),
            &product.category,
            filter.categories.contains(&product.category_id),
        );
        brands.bump(
            product.brand_id.as_str(),
            &product.brand,
            filter.brands.contains(&product.brand_id),
        );
    }
    vec![categories, brands]
}
