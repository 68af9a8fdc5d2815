use serde::{Deserialize, Serialize};

use super::PostSummary;

/// Posts per page on the public listing.
pub const DEFAULT_PAGE_SIZE: u64 = 9;

/// Largest page a listing request may ask for.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Page-number pagination metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl Pagination {
    /// Metadata for `page` of a collection holding `total_items` rows.
    pub fn new(page: u64, page_size: u64, total_items: u64) -> Self {
        let total_pages = total_items.div_ceil(page_size.max(1));
        Self {
            current_page: page,
            total_pages,
            total_items,
            has_next_page: page < total_pages,
            has_previous_page: page > 1,
        }
    }

    /// Shape returned when the listing could not be loaded.
    pub fn empty() -> Self {
        Self {
            current_page: 1,
            total_pages: 0,
            total_items: 0,
            has_next_page: false,
            has_previous_page: false,
        }
    }

    /// Row offset of the first item on `page`.
    pub fn offset(page: u64, page_size: u64) -> u64 {
        page.saturating_sub(1).saturating_mul(page_size)
    }
}

/// One window of the post listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPage {
    pub posts: Vec<PostSummary>,
    pub pagination: Pagination,
}

impl PostPage {
    pub fn empty() -> Self {
        Self {
            posts: Vec::new(),
            pagination: Pagination::empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_of_two_pages() {
        let p = Pagination::new(1, 9, 10);
        assert_eq!(p.total_pages, 2);
        assert!(p.has_next_page);
        assert!(!p.has_previous_page);
    }

    #[test]
    fn test_last_page() {
        let p = Pagination::new(2, 9, 10);
        assert!(!p.has_next_page);
        assert!(p.has_previous_page);
    }

    #[test]
    fn test_exact_multiple() {
        assert_eq!(Pagination::new(1, 9, 18).total_pages, 2);
        assert_eq!(Pagination::new(1, 9, 0).total_pages, 0);
    }

    #[test]
    fn test_offset() {
        assert_eq!(Pagination::offset(1, 9), 0);
        assert_eq!(Pagination::offset(3, 9), 18);
    }
}
