//! Pagination utilities for assessment listings

/// Default page size when the client does not ask for one
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Upper bound on client-requested page sizes
pub const MAX_PAGE_SIZE: i64 = 100;

/// Pagination metadata calculated from total results
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    /// Current page number (1-indexed)
    pub page: i64,
    /// Sanitized page size
    pub page_size: i64,
    /// Total number of pages
    pub total_pages: i64,
    /// Offset for SQL LIMIT/OFFSET query
    pub offset: i64,
}

/// Calculate pagination metadata from total results and the requested window
///
/// Page size is clamped into [1, MAX_PAGE_SIZE]; the page number is clamped
/// into [1, total_pages].
pub fn calculate_pagination(
    total_results: i64,
    requested_page: i64,
    requested_page_size: Option<i64>,
) -> Pagination {
    let page_size = requested_page_size
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
    fn test_pagination_normal() {
        let p = calculate_pagination(50, 2, None);
        assert_eq!(p.page, 2);
        assert_eq!(p.page_size, 20);
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.offset, 20);
    }

    #[test]
    fn test_pagination_custom_page_size() {
        let p = calculate_pagination(50, 1, Some(10));
        assert_eq!(p.total_pages, 5);
        assert_eq!(p.offset, 0);

        let p = calculate_pagination(50, 3, Some(10));
        assert_eq!(p.offset, 20);
    }

    #[test]
    fn test_pagination_page_size_clamped() {
        let p = calculate_pagination(1000, 1, Some(10_000));
        assert_eq!(p.page_size, MAX_PAGE_SIZE);

        let p = calculate_pagination(1000, 1, Some(0));
        assert_eq!(p.page_size, 1);
    }

    #[test]
    fn test_pagination_out_of_bounds_high() {
        let p = calculate_pagination(30, 99, None);
        assert_eq!(p.page, 2); // Clamped to last page
        assert_eq!(p.offset, 20);
    }

    #[test]
    fn test_pagination_out_of_bounds_low() {
        let p = calculate_pagination(30, 0, None);
        assert_eq!(p.page, 1);
        assert_eq!(p.offset, 0);
    }

    #[test]
    fn test_pagination_empty() {
        let p = calculate_pagination(0, 1, None);
        assert_eq!(p.page, 1);
        assert_eq!(p.total_pages, 0);
        assert_eq!(p.offset, 0);
    }
}
