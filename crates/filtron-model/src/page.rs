//! Pagination and sorting parameters.

use serde::{Deserialize, Serialize};

/// Default page number (pages are 1-based).
pub const DEFAULT_PAGE: u32 = 1;
/// Default page size.
pub const DEFAULT_SIZE: u32 = 10;
/// Maximum allowed page size; larger requests are clamped.
pub const MAX_SIZE: u32 = 100;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

/// Sort specification for one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Field to order by.
    pub field: String,
    /// Sort direction.
    pub direction: SortDirection,
}

impl SortSpec {
    /// Create an ascending sort spec.
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    /// Create a descending sort spec.
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Pagination request with optional sorting.
///
/// Page numbers are 1-based; a page below 1 falls back to
/// [`DEFAULT_PAGE`] and sizes above [`MAX_SIZE`] are clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u32,
    /// Items per page.
    pub size: u32,
    /// Sort specifications, applied in order.
    pub sort: Vec<SortSpec>,
}

impl PageRequest {
    /// Create a page request, normalizing out-of-range values.
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page: if page < 1 { DEFAULT_PAGE } else { page },
            size: size.min(MAX_SIZE),
            sort: Vec::new(),
        }
    }

    /// Add a sort specification.
    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort.push(sort);
        self
    }

    /// Zero-based item offset of the first item on this page.
    pub fn offset(&self) -> usize {
        (self.page as usize - 1) * self.size as usize
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_SIZE)
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// 1-based page number.
    pub page: u32,
    /// Requested page size.
    pub size: u32,
    /// Total matching items across all pages.
    pub total_items: usize,
}

impl<T> Page<T> {
    /// Create a page of results.
    pub fn new(items: Vec<T>, page: u32, size: u32, total_items: usize) -> Self {
        Self {
            items,
            page,
            size,
            total_items,
        }
    }

    /// Total number of pages.
    pub fn total_pages(&self) -> u32 {
        if self.size == 0 {
            return 0;
        }
        self.total_items.div_ceil(self.size as usize) as u32
    }
}
