//! Paginación de listados
//!
//! `page` empieza en 1; `limit` se acota a 1..=100.

use serde::Serialize;

pub const MAX_LIMIT: i64 = 100;
pub const DEFAULT_LIMIT: i64 = 10;
/// Listados del kardex (transacciones, transferencias, conteos)
pub const LEDGER_LIMIT: i64 = 20;

/// Página solicitada ya normalizada
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: i64,
    pub limit: i64,
}

impl PageParams {
    pub fn new(page: Option<i64>, limit: Option<i64>, default_limit: i64) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(default_limit).clamp(1, MAX_LIMIT),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    pub fn pagination(&self, total_items: i64) -> Pagination {
        Pagination {
            current_page: self.page,
            total_pages: total_pages(total_items, self.limit),
            total_items,
            items_per_page: self.limit,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_items: i64,
    pub items_per_page: i64,
}

/// `ceil(total_items / items_per_page)`
pub fn total_pages(total_items: i64, items_per_page: i64) -> i64 {
    if items_per_page <= 0 || total_items <= 0 {
        return 0;
    }
    (total_items + items_per_page - 1) / items_per_page
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = PageParams::new(None, None, DEFAULT_LIMIT);
        assert_eq!(params, PageParams { page: 1, limit: 10 });
        assert_eq!(params.offset(), 0);

        let ledger = PageParams::new(None, None, LEDGER_LIMIT);
        assert_eq!(ledger.limit, 20);
    }

    #[test]
    fn test_clamping() {
        assert_eq!(PageParams::new(Some(0), Some(0), 10), PageParams { page: 1, limit: 1 });
        assert_eq!(PageParams::new(Some(-3), Some(500), 10), PageParams { page: 1, limit: 100 });
    }

    #[test]
    fn test_offset() {
        assert_eq!(PageParams::new(Some(3), Some(25), 10).offset(), 50);
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(101, 20), 6);
    }

    #[test]
    fn test_pagination_serializes_camel_case() {
        let value = serde_json::to_value(PageParams::new(Some(2), Some(5), 10).pagination(12)).unwrap();
        assert_eq!(value["currentPage"], 2);
        assert_eq!(value["totalPages"], 3);
        assert_eq!(value["totalItems"], 12);
        assert_eq!(value["itemsPerPage"], 5);
    }
}
