//! Page/limit pagination utilities.

/// Default page size for listing endpoints.
pub const DEFAULT_LIMIT: i64 = 20;

/// Maximum page size for listing endpoints.
pub const MAX_LIMIT: i64 = 100;

/// Normalized pagination window derived from raw query parameters.
///
/// Raw values are clamped, never rejected: page floors at 1, limit is
/// clamped into 1..=100 with a default of 20.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Builds a window from optional query parameters.
    pub fn from_query(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = page.unwrap_or(1).max(1);
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        Self { page, limit }
    }

    /// Row offset of the first row on this page.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_absent() {
        let window = PageRequest::from_query(None, None);
        assert_eq!(window.page, 1);
        assert_eq!(window.limit, DEFAULT_LIMIT);
        assert_eq!(window.offset(), 0);
    }

    #[test]
    fn page_floors_at_one() {
        assert_eq!(PageRequest::from_query(Some(0), None).page, 1);
        assert_eq!(PageRequest::from_query(Some(-5), None).page, 1);
        assert_eq!(PageRequest::from_query(Some(3), None).page, 3);
    }

    #[test]
    fn limit_clamped_into_range() {
        assert_eq!(PageRequest::from_query(None, Some(0)).limit, 1);
        assert_eq!(PageRequest::from_query(None, Some(250)).limit, MAX_LIMIT);
        assert_eq!(PageRequest::from_query(None, Some(50)).limit, 50);
    }

    #[test]
    fn offset_advances_by_whole_pages() {
        let window = PageRequest::from_query(Some(4), Some(25));
        assert_eq!(window.offset(), 75);
    }
}
