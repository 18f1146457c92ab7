//! Offset pagination helpers for listing endpoints.

use serde::Serialize;

pub const DEFAULT_PAGE_LIMIT: u32 = 20;
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Requested page, 1-based, with a clamped limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: u32,
    pub limit: u32,
}

impl PageParams {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_PAGE_LIMIT),
        }
    }

    /// Lenient parse of raw query values. Unparsable or non-positive input falls back to
    /// the defaults, oversized limits are capped.
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Self {
        let page = parse_positive(page).unwrap_or(1);
        let limit = parse_positive(limit).unwrap_or(DEFAULT_PAGE_LIMIT);
        Self::new(page, limit)
    }

    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }
}

impl Default for PageParams {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_LIMIT)
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|value| *value > 0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total_count: i64,
    pub total_pages: i64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl Pagination {
    pub fn new(params: PageParams, total_count: i64) -> Self {
        let limit = i64::from(params.limit);
        let total_count = total_count.max(0);
        let total_pages = (total_count + limit - 1) / limit;
        Self {
            page: params.page,
            limit: params.limit,
            total_count,
            total_pages,
            has_next_page: i64::from(params.page) < total_pages,
            has_prev_page: params.page > 1,
        }
    }
}

/// `{ data, pagination }` envelope.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, params: PageParams, total_count: i64) -> Self {
        Self {
            data,
            pagination: Pagination::new(params, total_count),
        }
    }
}
