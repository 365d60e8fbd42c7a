use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{CampusError, Result};
use crate::types::enums::{ModerationStatus, SortOrder};
use crate::types::subject::ModerationSubject;

/// Filter value meaning "no constraint"; never sent to the backend.
pub const FILTER_ALL: &str = "all";

/// Parameters for one list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    page: u32,
    limit: u32,
    filters: BTreeMap<String, String>,
    sort_by: Option<String>,
    sort_order: SortOrder,
}

impl ListQuery {
    /// # Errors
    ///
    /// Returns `CampusError::Validation` if `page` or `limit` is zero.
    pub fn new(page: u32, limit: u32) -> Result<Self> {
        if page == 0 {
            return Err(CampusError::Validation("page must be at least 1".into()));
        }
        if limit == 0 {
            return Err(CampusError::Validation("limit must be positive".into()));
        }
        Ok(Self {
            page,
            limit,
            filters: BTreeMap::new(),
            sort_by: None,
            sort_order: SortOrder::default(),
        })
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    pub fn with_sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(field.into());
        self.sort_order = order;
        self
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    pub fn sort_by(&self) -> Option<&str> {
        self.sort_by.as_deref()
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub fn set_page(&mut self, page: u32) -> Result<()> {
        if page == 0 {
            return Err(CampusError::Validation("page must be at least 1".into()));
        }
        self.page = page;
        Ok(())
    }

    pub(crate) fn replace_filters(&mut self, filters: BTreeMap<String, String>) {
        self.filters = filters;
    }

    pub(crate) fn set_sort(&mut self, field: Option<String>, order: SortOrder) {
        self.sort_by = field;
        self.sort_order = order;
    }

    /// The status the list is restricted to, `None` meaning all statuses.
    pub fn status_filter(&self) -> Option<ModerationStatus> {
        self.filters
            .get("status")
            .filter(|v| !v.is_empty() && v.as_str() != FILTER_ALL)
            .and_then(|v| v.parse().ok())
    }

    /// Query-string pairs. Empty and `all` filter values are omitted.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ];
        for (k, v) in &self.filters {
            let v = v.trim();
            if v.is_empty() || v == FILTER_ALL {
                continue;
            }
            params.push((k.clone(), v.to_string()));
        }
        if let Some(field) = &self.sort_by {
            params.push(("sortBy".to_string(), field.clone()));
            params.push(("sortOrder".to_string(), self.sort_order.to_string()));
        }
        params
    }

    /// Rows a correct backend returns for this query given `total_count`.
    pub fn expected_rows(&self, total_count: u64) -> u64 {
        let skipped = u64::from(self.page - 1) * u64::from(self.limit);
        total_count
            .saturating_sub(skipped)
            .min(u64::from(self.limit))
    }
}

/// Pagination block of a list response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_count: u64,
    #[serde(default)]
    pub limit: u32,
}

/// `data` of a list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListData<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

/// One page of results as held by the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_count: u64,
    pub limit: u32,
}

impl<T> Page<T> {
    pub fn empty(limit: u32) -> Self {
        Self {
            items: Vec::new(),
            current_page: 1,
            total_pages: 0,
            total_count: 0,
            limit,
        }
    }

    /// Build from wire data, clamping `current_page` into `[1, max(total_pages, 1)]`.
    pub fn from_list(data: ListData<T>) -> Self {
        let p = data.pagination;
        let upper = p.total_pages.max(1);
        let current_page = p.current_page.clamp(1, upper);
        if current_page != p.current_page {
            warn!(
                reported = p.current_page,
                total_pages = p.total_pages,
                "backend current page out of range, clamped"
            );
        }
        Self {
            items: data.items,
            current_page,
            total_pages: p.total_pages,
            total_count: p.total_count,
            limit: p.limit,
        }
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }
}

impl<T: ModerationSubject> Page<T> {
    pub fn ids(&self) -> Vec<String> {
        self.items.iter().map(|i| i.id().to_string()).collect()
    }

    pub fn find(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|i| i.id() == id)
    }

    /// Drop an item from the displayed rows. Returns whether it was present.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.id() != id);
        let removed = self.items.len() != before;
        if removed {
            self.total_count = self.total_count.saturating_sub(1);
        }
        removed
    }

    /// Replace an item in place. Returns whether it was present.
    pub fn replace(&mut self, item: T) -> bool {
        match self.items.iter_mut().find(|i| i.id() == item.id()) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }

    pub fn set_status(&mut self, id: &str, status: ModerationStatus) -> bool {
        match self.items.iter_mut().find(|i| i.id() == id) {
            Some(item) => {
                item.set_status(status);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_rejects_zero_page_and_limit() {
        assert!(ListQuery::new(0, 10).is_err());
        assert!(ListQuery::new(1, 0).is_err());
        let mut q = ListQuery::new(1, 10).unwrap();
        assert!(q.set_page(0).is_err());
        assert_eq!(q.page(), 1);
    }

    #[test]
    fn test_params_skip_all_and_empty() {
        let q = ListQuery::new(2, 25)
            .unwrap()
            .with_filter("status", "all")
            .with_filter("search", "  ")
            .with_filter("days", "7")
            .with_sort("createdAt", SortOrder::Asc);
        let params = q.to_params();
        assert!(params.contains(&("page".into(), "2".into())));
        assert!(params.contains(&("limit".into(), "25".into())));
        assert!(params.contains(&("days".into(), "7".into())));
        assert!(params.contains(&("sortBy".into(), "createdAt".into())));
        assert!(params.contains(&("sortOrder".into(), "asc".into())));
        assert!(!params.iter().any(|(k, _)| k == "status" || k == "search"));
    }

    #[test]
    fn test_status_filter() {
        let q = ListQuery::new(1, 10).unwrap();
        assert_eq!(q.status_filter(), None);
        let q = q.with_filter("status", "pending");
        assert_eq!(q.status_filter(), Some(ModerationStatus::Pending));
        let q = q.with_filter("status", "all");
        assert_eq!(q.status_filter(), None);
    }

    #[test]
    fn test_expected_rows() {
        let q = ListQuery::new(1, 10).unwrap();
        assert_eq!(q.expected_rows(23), 10);
        let q = ListQuery::new(3, 10).unwrap();
        assert_eq!(q.expected_rows(23), 3);
        let q = ListQuery::new(4, 10).unwrap();
        assert_eq!(q.expected_rows(23), 0);
    }

    #[test]
    fn test_from_list_clamps_current_page() {
        let page: Page<u8> = Page::from_list(ListData {
            items: vec![],
            pagination: Pagination {
                current_page: 0,
                total_pages: 0,
                total_count: 0,
                limit: 10,
            },
        });
        assert_eq!(page.current_page, 1);

        let page: Page<u8> = Page::from_list(ListData {
            items: vec![],
            pagination: Pagination {
                current_page: 9,
                total_pages: 3,
                total_count: 23,
                limit: 10,
            },
        });
        assert_eq!(page.current_page, 3);
        assert!(!page.has_next());
        assert!(page.has_prev());
    }
}
