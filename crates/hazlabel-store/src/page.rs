//! Fixed-size pagination.

use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// One page of results. `page` is 1-based and always within `1..=total_pages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub total_results: usize,
    pub page_size: usize,
}

/// `max(1, ceil(total / page_size))`.
pub fn total_pages(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Slice out the requested page, clamping it into range first.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_pages = total_pages(items.len(), page_size);
    let page = clamp_page(page, total_pages);
    let start = (page - 1) * page_size;
    let end = (start + page_size).min(items.len());
    Page {
        items: items.get(start..end).map(<[T]>::to_vec).unwrap_or_default(),
        page,
        total_pages,
        total_results: items.len(),
        page_size,
    }
}
