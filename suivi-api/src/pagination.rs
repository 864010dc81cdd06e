//! Pagination utilities for suivi-api
//!
//! List endpoints default to 10 rows per page; clients may raise the page
//! size up to 100 via `?page_size=`.

use serde::Serialize;

/// Default page size for all paginated lists
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Largest page size a client may request
pub const MAX_PAGE_SIZE: i64 = 100;

/// Pagination metadata calculated from total results
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    /// Current page number (1-indexed)
    pub page: i64,
    /// Effective page size after clamping
    pub page_size: i64,
    /// Total number of pages
    pub total_pages: i64,
    /// Offset for SQL LIMIT/OFFSET query
    pub offset: i64,
}

/// Standard paginated response envelope
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub count: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn new(count: i64, p: Pagination, results: Vec<T>) -> Self {
        Self {
            count,
            page: p.page,
            page_size: p.page_size,
            total_pages: p.total_pages,
            results,
        }
    }
}

/// Calculate pagination metadata from total results, requested page and
/// requested page size.
///
/// The page size defaults to [`DEFAULT_PAGE_SIZE`] and is clamped to
/// `[1, MAX_PAGE_SIZE]`; the page is clamped to `[1, total_pages]`.
pub fn paginate(total_results: i64, requested_page: i64, requested_size: Option<i64>) -> Pagination {
    let page_size = requested_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let total_pages = (total_results + page_size - 1) / page_size;
    let page = requested_page.max(1).min(total_pages.max(1));
    let offset = (page - 1) * page_size;

    Pagination {
        page,
        page_size,
        total_pages,
        offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_page_size() {
        let p = paginate(25, 2, None);
        assert_eq!(p.page, 2);
        assert_eq!(p.page_size, 10);
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.offset, 10);
    }

    #[test]
    fn test_client_page_size() {
        let p = paginate(250, 1, Some(50));
        assert_eq!(p.page_size, 50);
        assert_eq!(p.total_pages, 5);
    }

    #[test]
    fn test_page_size_clamped_to_max() {
        let p = paginate(1000, 1, Some(500));
        assert_eq!(p.page_size, MAX_PAGE_SIZE);
        assert_eq!(p.total_pages, 10);
    }

    #[test]
    fn test_page_size_clamped_to_min() {
        let p = paginate(10, 1, Some(0));
        assert_eq!(p.page_size, 1);
        assert_eq!(p.total_pages, 10);
    }

    #[test]
    fn test_out_of_bounds_page_high() {
        let p = paginate(15, 99, None);
        assert_eq!(p.page, 2); // Clamped to last page
        assert_eq!(p.offset, 10);
    }

    #[test]
    fn test_out_of_bounds_page_low() {
        let p = paginate(15, 0, None);
        assert_eq!(p.page, 1);
        assert_eq!(p.offset, 0);
    }

    #[test]
    fn test_empty_results() {
        let p = paginate(0, 1, None);
        assert_eq!(p.page, 1);
        assert_eq!(p.total_pages, 0);
        assert_eq!(p.offset, 0);
    }

    #[test]
    fn test_exact_page_boundary() {
        let p = paginate(20, 2, None);
        assert_eq!(p.page, 2);
        assert_eq!(p.total_pages, 2);
        assert_eq!(p.offset, 10);
    }
}
