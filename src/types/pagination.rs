//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Raw list query parameters.
///
/// Values stay as text so that garbage like `page=abc` falls back to the
/// defaults instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Page number, 1-based
    pub page: Option<String>,
    /// Items per page, capped at 100
    pub limit: Option<String>,
    /// Case-insensitive substring search
    pub search: Option<String>,
    /// Exact tag membership (posts)
    pub tag: Option<String>,
    /// Exact role (users)
    pub role: Option<String>,
}

impl ListQuery {
    /// Resolve page and limit with the given default page size.
    pub fn page_request(&self, default_limit: u64) -> PageRequest {
        PageRequest::new(
            positive(self.page.as_deref()).unwrap_or(DEFAULT_PAGE_NUMBER),
            positive(self.limit.as_deref()).unwrap_or(default_limit),
        )
    }

    pub fn search_term(&self) -> Option<String> {
        non_blank(self.search.as_deref())
    }

    pub fn tag(&self) -> Option<String> {
        non_blank(self.tag.as_deref())
    }

    pub fn role(&self) -> Option<String> {
        non_blank(self.role.as_deref())
    }
}

fn positive(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
}

fn non_blank(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// A resolved page window. `page >= 1`, `1 <= limit <= 100`, and the
/// offset always fits a signed 64-bit SQL parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

impl PageRequest {
    pub fn new(page: u64, limit: u64) -> Self {
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        let last_page = i64::MAX as u64 / limit + 1;
        Self {
            page: page.clamp(1, last_page),
            limit,
        }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Calculate offset for database query
    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.limit
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE)
    }
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub current_page: u64,
    pub total_pages: u64,
    pub total: u64,
    pub limit: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn new(request: PageRequest, returned: u64, total: u64) -> Self {
        Self {
            current_page: request.page(),
            total_pages: total.div_ceil(request.limit()),
            total,
            limit: request.limit(),
            has_next: request.offset() + returned < total,
            has_prev: request.page() > 1,
        }
    }
}

/// One page of results plus the total row count under the same filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub request: PageRequest,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            request,
        }
    }

    pub fn meta(&self) -> PaginationMeta {
        PaginationMeta::new(self.request, self.items.len() as u64, self.total)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            request: self.request,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_COMMENT_PAGE_SIZE;

    fn query(page: &str, limit: &str) -> ListQuery {
        ListQuery {
            page: Some(page.to_string()),
            limit: Some(limit.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let req = ListQuery::default().page_request(DEFAULT_PAGE_SIZE);
        assert_eq!(req.page(), 1);
        assert_eq!(req.limit(), 10);
        assert_eq!(req.offset(), 0);

        let req = ListQuery::default().page_request(DEFAULT_COMMENT_PAGE_SIZE);
        assert_eq!(req.limit(), 20);
    }

    #[test]
    fn test_garbage_and_zero_fall_back_to_defaults() {
        let req = query("abc", "0").page_request(DEFAULT_PAGE_SIZE);
        assert_eq!(req.page(), 1);
        assert_eq!(req.limit(), 10);

        let req = query("-3", "ten").page_request(DEFAULT_PAGE_SIZE);
        assert_eq!(req, PageRequest::default());
    }

    #[test]
    fn test_limit_is_capped() {
        let req = query("2", "500").page_request(DEFAULT_PAGE_SIZE);
        assert_eq!(req.limit(), 100);
        assert_eq!(req.offset(), 100);
    }

    #[test]
    fn test_huge_page_keeps_offset_in_range() {
        let req = query("9223372036854775808", "10").page_request(DEFAULT_PAGE_SIZE);
        assert!(i64::try_from(req.offset()).is_ok());
        assert_eq!(req.page(), i64::MAX as u64 / 10 + 1);

        let req = query("100000000000000000", "100").page_request(DEFAULT_PAGE_SIZE);
        assert!(i64::try_from(req.offset()).is_ok());

        let req = PageRequest::new(u64::MAX, 1);
        assert_eq!(req.offset(), i64::MAX as u64);

        let meta = PaginationMeta::new(req, 0, 3);
        assert!(!meta.has_next);
        assert!(meta.has_prev);
    }

    #[test]
    fn test_offset() {
        assert_eq!(query("3", "15").page_request(10).offset(), 30);
    }

    #[test]
    fn test_meta_flags() {
        let meta = PaginationMeta::new(PageRequest::new(1, 10), 10, 25);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_next);
        assert!(!meta.has_prev);

        let meta = PaginationMeta::new(PageRequest::new(3, 10), 5, 25);
        assert!(!meta.has_next);
        assert!(meta.has_prev);

        let meta = PaginationMeta::new(PageRequest::new(1, 10), 0, 0);
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_next);
    }

    #[test]
    fn test_blank_filters_are_ignored() {
        let q = ListQuery {
            search: Some("   ".to_string()),
            tag: Some(" rust ".to_string()),
            ..Default::default()
        };
        assert_eq!(q.search_term(), None);
        assert_eq!(q.tag(), Some("rust".to_string()));
    }

    #[test]
    fn test_meta_serializes_camel_case() {
        let meta = PaginationMeta::new(PageRequest::new(2, 10), 10, 30);
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["currentPage"], 2);
        assert_eq!(json["totalPages"], 3);
        assert_eq!(json["hasNext"], true);
        assert_eq!(json["hasPrev"], true);
    }
}
