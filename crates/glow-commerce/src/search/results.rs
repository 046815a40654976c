//! Search results and pagination.

use crate::search::PageSpec;
use serde::{Deserialize, Serialize};

/// Pagination info, already clamped to the result set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Current page (1-indexed), within `1..=total_pages`.
    pub page: usize,
    /// Items per page.
    pub page_size: usize,
    /// Total number of matching items.
    pub total: usize,
    /// Total number of pages; at least 1.
    pub total_pages: usize,
    /// Whether there's a next page.
    pub has_next: bool,
    /// Whether there's a previous page.
    pub has_prev: bool,
}

impl Pagination {
    /// Create pagination info, clamping the requested page into range.
    ///
    /// A zero page size is treated as 1; callers validate [`PageSpec`]
    /// before getting here.
    pub fn new(requested: PageSpec, total: usize) -> Self {
        let page_size = requested.page_size.max(1);
        let total_pages = total.div_ceil(page_size).max(1);
        let page = requested.page_number.clamp(1, total_pages);

        Self {
            page,
            page_size,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }

    /// Index of the first item on this page.
    pub fn offset(&self) -> usize {
        (self.page - 1) * self.page_size
    }

    /// Index range of this page within the full result list.
    pub fn range(&self) -> std::ops::Range<usize> {
        let start = self.offset().min(self.total);
        let end = (start + self.page_size).min(self.total);
        start..end
    }

    /// Check if on first page.
    pub fn is_first(&self) -> bool {
        self.page == 1
    }

    /// Check if on last page.
    pub fn is_last(&self) -> bool {
        self.page >= self.total_pages
    }

    /// Get start item number (1-indexed), 0 when there are no items.
    pub fn start_item(&self) -> usize {
        if self.total == 0 {
            0
        } else {
            self.offset() + 1
        }
    }

    /// Get end item number.
    pub fn end_item(&self) -> usize {
        (self.page * self.page_size).min(self.total)
    }

    /// Page links for a pager, e.g. `1 … 4 5 6 … 10`.
    ///
    /// When there are at most `max_visible` pages all are listed. Otherwise
    /// the first and last page are always shown along with the neighbours
    /// of the current page, and skipped runs collapse into an ellipsis.
    pub fn page_window(&self, max_visible: usize) -> Vec<PageLink> {
        let last = self.total_pages;
        if last <= max_visible.max(1) {
            return (1..=last).map(PageLink::Page).collect();
        }

        let start = self.page.saturating_sub(1).max(2);
        let end = (self.page + 1).min(last - 1);

        let mut links = vec![PageLink::Page(1)];
        if start > 2 {
            links.push(PageLink::Ellipsis);
        }
        links.extend((start..=end).map(PageLink::Page));
        if end < last - 1 {
            links.push(PageLink::Ellipsis);
        }
        links.push(PageLink::Page(last));
        links
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(PageSpec::default(), 0)
    }
}

/// One entry in a pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "page")]
pub enum PageLink {
    /// A page number.
    Page(usize),
    /// A collapsed run of pages.
    Ellipsis,
}

/// Search results container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults<T> {
    /// The items on the current page.
    pub items: Vec<T>,
    /// Pagination info.
    pub pagination: Pagination,
    /// Facets (if requested).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub facets: Vec<Facet>,
}

impl<T> SearchResults<T> {
    /// Create new search results.
    pub fn new(items: Vec<T>, pagination: Pagination) -> Self {
        Self {
            items,
            pagination,
            facets: Vec::new(),
        }
    }

    /// Create empty results.
    pub fn empty() -> Self {
        Self::new(Vec::new(), Pagination::default())
    }

    /// Set facets.
    pub fn with_facets(mut self, facets: Vec<Facet>) -> Self {
        self.facets = facets;
        self
    }

    /// Total matches across all pages.
    pub fn total(&self) -> usize {
        self.pagination.total
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get number of items in this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl<T> Default for SearchResults<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// A facet for filtering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Facet {
    /// Facet name (e.g., "Category").
    pub name: String,
    /// Field this facet filters on.
    pub field: String,
    /// Facet values, in first-seen order.
    pub values: Vec<FacetValue>,
}

impl Facet {
    /// Create an empty facet.
    pub fn new(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field: field.into(),
            values: Vec::new(),
        }
    }

    /// Count one occurrence of `value`, adding it on first sight.
    pub fn bump(&mut self, value: &str, label: &str, selected: bool) {
        match self.values.iter_mut().find(|v| v.value == value) {
            Some(existing) => existing.count += 1,
            None => self.values.push(FacetValue {
                value: value.to_string(),
                label: label.to_string(),
                count: 1,
                selected,
            }),
        }
    }

    /// Look up a value's entry.
    pub fn get(&self, value: &str) -> Option<&FacetValue> {
        self.values.iter().find(|v| v.value == value)
    }
}

/// A single facet value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FacetValue {
    /// The id filtered on.
    pub value: String,
    /// Display label.
    pub label: String,
    /// Number of items with this value.
    pub count: usize,
    /// Whether currently selected.
    pub selected: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(page: usize, size: usize, total: usize) -> Pagination {
        Pagination::new(PageSpec::new(page, size), total)
    }

    fn numbers(links: &[PageLink]) -> Vec<Option<usize>> {
        links
            .iter()
            .map(|link| match link {
                PageLink::Page(n) => Some(*n),
                PageLink::Ellipsis => None,
            })
            .collect()
    }

    #[test]
    fn test_pagination_basics() {
        let p = pages(2, 10, 45);
        assert_eq!(p.total_pages, 5);
        assert!(p.has_next);
        assert!(p.has_prev);
        assert_eq!(p.offset(), 10);
        assert_eq!(p.range(), 10..20);
    }

    #[test]
    fn test_pagination_clamps_page() {
        let p = pages(9, 10, 45);
        assert_eq!(p.page, 5);
        assert!(p.is_last());
        assert_eq!(p.range(), 40..45);

        let p = pages(0, 10, 45);
        assert_eq!(p.page, 1);
        assert!(p.is_first());
    }

    #[test]
    fn test_pagination_empty() {
        let p = pages(3, 10, 0);
        assert_eq!(p.total_pages, 1);
        assert_eq!(p.page, 1);
        assert_eq!(p.start_item(), 0);
        assert_eq!(p.end_item(), 0);
        assert_eq!(p.range(), 0..0);
        assert!(!p.has_next);
        assert!(!p.has_prev);
    }

    #[test]
    fn test_pagination_item_range() {
        let p = pages(2, 10, 45);
        assert_eq!(p.start_item(), 11);
        assert_eq!(p.end_item(), 20);

        let last = pages(5, 10, 45);
        assert_eq!(last.start_item(), 41);
        assert_eq!(last.end_item(), 45);
    }

    #[test]
    fn test_page_window_small() {
        let p = pages(2, 10, 70);
        assert_eq!(numbers(&p.page_window(7)), (1..=7).map(Some).collect::<Vec<_>>());
    }

    #[test]
    fn test_page_window_middle() {
        let p = pages(5, 10, 100);
        assert_eq!(
            numbers(&p.page_window(7)),
            vec![Some(1), None, Some(4), Some(5), Some(6), None, Some(10)]
        );
    }

    #[test]
    fn test_page_window_edges() {
        let first = pages(1, 10, 100);
        assert_eq!(numbers(&first.page_window(7)), vec![Some(1), Some(2), None, Some(10)]);

        let near_start = pages(3, 10, 100);
        assert_eq!(
            numbers(&near_start.page_window(7)),
            vec![Some(1), Some(2), Some(3), Some(4), None, Some(10)]
        );

        let last = pages(10, 10, 100);
        assert_eq!(numbers(&last.page_window(7)), vec![Some(1), None, Some(9), Some(10)]);
    }

    #[test]
    fn test_facet_bump() {
        let mut facet = Facet::new("Category", "categoryId");
        facet.bump("skincare", "Skincare", true);
        facet.bump("makeup", "Makeup", false);
        facet.bump("skincare", "Skincare", true);

        assert_eq!(facet.values.len(), 2);
        assert_eq!(facet.get("skincare").map(|v| v.count), Some(2));
        assert_eq!(facet.values[1].value, "makeup");
    }
}
