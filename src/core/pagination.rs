//! Pagination state, the backend page envelope and the page-number window

use serde::{Deserialize, Serialize};

/// Default number of page buttons shown around the current page
pub const DEFAULT_MAX_VISIBLE: u32 = 5;

/// Compute the visible run of page numbers for a pager
///
/// The window is centered on `current_page` and slides back inside
/// `[1, total_pages]` near either end, so it keeps its full width whenever
/// enough pages exist.
pub fn window_of(current_page: u32, total_pages: u32, max_visible: u32) -> Vec<u32> {
    if total_pages == 0 || max_visible == 0 {
        return Vec::new();
    }

    let current = current_page.clamp(1, total_pages);
    let width = max_visible.min(total_pages);
    // Last start that still fits `width` pages without passing `total_pages`
    let last_start = total_pages - (width - 1);
    let start = current
        .saturating_sub(max_visible / 2)
        .max(1)
        .min(last_start);

    (start..=start + (width - 1)).collect()
}

/// Page envelope returned by paged list endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<E> {
    pub items: Vec<E>,
    pub total_count: u64,
    pub page: u32,
    pub page_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
}

/// A page request sent to a paged list endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }
}

/// Pagination fields of a collection view
///
/// `current_page` stays within `[1, max(total_pages, 1)]` and
/// `total_pages == ceil(total_items / page_size)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageState {
    pub current_page: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

impl PageState {
    /// No items at all
    pub fn empty(page_size: u32) -> Self {
        Self::local(0, page_size, 1)
    }

    /// Pagination for a view holding exactly one record (search hit)
    pub fn single(page_size: u32) -> Self {
        Self::local(1, page_size.max(1), 1)
    }

    /// Pagination for a collection paged on this side
    pub fn local(total_items: u64, page_size: u32, requested_page: u32) -> Self {
        let page_size = page_size.max(1);
        let total_pages = total_pages_for(total_items, page_size);
        Self {
            current_page: clamp_page(requested_page, total_pages),
            page_size,
            total_items,
            total_pages,
        }
    }

    /// Pagination reported by the backend's page envelope
    ///
    /// `totalPages` is recomputed from `totalCount` so the invariant holds
    /// even when the envelope omits or misreports it.
    pub fn from_envelope<E>(envelope: &PagedResult<E>, fallback_page_size: u32) -> Self {
        let page_size = if envelope.page_size == 0 {
            fallback_page_size
        } else {
            envelope.page_size
        };
        Self::local(envelope.total_count, page_size, envelope.page)
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Clamp an arbitrary page number into this state's valid range
    pub fn clamp(&self, page: u32) -> u32 {
        clamp_page(page, self.total_pages)
    }

    /// Page-number window around the current page
    pub fn window(&self, max_visible: u32) -> Vec<u32> {
        window_of(self.current_page, self.total_pages, max_visible)
    }

    /// Index range of the current page within the full collection
    pub fn slice_bounds(&self) -> std::ops::Range<usize> {
        let start = (self.current_page.saturating_sub(1) as u64 * self.page_size as u64)
            .min(self.total_items) as usize;
        let end = (start as u64 + self.page_size as u64).min(self.total_items) as usize;
        start..end
    }
}

fn total_pages_for(total_items: u64, page_size: u32) -> u32 {
    total_items.div_ceil(page_size.max(1) as u64) as u32
}

fn clamp_page(page: u32, total_pages: u32) -> u32 {
    page.clamp(1, total_pages.max(1))
}
