//! Search module.
//!
//! Filters, sort keys, pagination and the query pipeline that ties them
//! together.

pub mod engine;
mod filter;
mod query;
mod results;

pub use engine::{facets, paginate, query};
pub use filter::{FilterSpec, PriceRange};
pub use query::{PageSpec, SortSpec};
pub use results::{Facet, FacetValue, PageLink, Pagination, SearchResults};
