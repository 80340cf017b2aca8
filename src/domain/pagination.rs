//! Page slicing over an in-memory result set

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: u32,
    pub limit: u32,
    /// Size of the full candidate set, not of this page
    pub total: usize,
    pub total_pages: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

/// Returns the 1-indexed `page` of `items`
///
/// `page` and `limit` below 1 are clamped to 1. Pages past the end yield an
/// empty slice with accurate metadata rather than an error.
pub fn paginate<T: Clone>(items: &[T], page: u32, limit: u32) -> Page<T> {
    let page = page.max(1);
    let limit = limit.max(1);
    let total = items.len();
    let total_pages = total.div_ceil(limit as usize) as u32;

    let start = (page as usize - 1).saturating_mul(limit as usize);
    let slice = if start >= total {
        Vec::new()
    } else {
        let end = (start + limit as usize).min(total);
        items[start..end].to_vec()
    };

    Page {
        items: slice,
        meta: PageMeta {
            page,
            limit,
            total,
            total_pages,
            has_next_page: page < total_pages,
            has_prev_page: page > 1,
        },
    }
}
