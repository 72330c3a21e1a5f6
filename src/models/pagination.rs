use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PaginationInfo {
    pub current_page: u32, // (1-based)
    pub total_pages: u32,
    pub total_items: u64,
    pub page_size: u32, // number of elements per page
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl PaginationInfo {
    pub fn new(current_page: u32, page_size: u32, total_items: u64) -> Self {
        let total_pages = total_items.div_ceil(page_size as u64) as u32;
        Self {
            current_page,
            total_pages,
            total_items,
            page_size,
            has_next_page: current_page < total_pages,
            has_previous_page: current_page > 1,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct PaginationQuery {
    pub page: Option<u32>, // 1-based
    pub limit: Option<u32>,
}

impl PaginationQuery {
    /// Page and page size with defaults applied; both are at least 1.
    pub fn resolve(&self) -> (u32, u32) {
        let page = self.page.unwrap_or(1).max(1);
        let page_size = self.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1);
        (page, page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_info() {
        let info = PaginationInfo::new(1, 10, 15);
        assert_eq!(info.total_pages, 2);
        assert!(info.has_next_page);
        assert!(!info.has_previous_page);

        let info = PaginationInfo::new(2, 10, 20);
        assert_eq!(info.total_pages, 2);
        assert!(!info.has_next_page);

        assert_eq!(PaginationInfo::new(1, 10, 0).total_pages, 0);
    }

    #[test]
    fn test_resolve_defaults() {
        assert_eq!(PaginationQuery::default().resolve(), (1, 10));
        let query = PaginationQuery {
            page: Some(0),
            limit: Some(0),
        };
        assert_eq!(query.resolve(), (1, 1));
    }
}
