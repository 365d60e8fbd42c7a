//! Draft vs applied filter criteria.
//!
//! Edits go to the draft. Staged fields (free-text search and the like) stay
//! there until [`FilterState::apply`]; live fields (status and sort selectors)
//! are committed immediately. Either way the page goes back to 1.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::screen::Screen;
use crate::types::{ListQuery, ModerationStatus, SortOrder, FILTER_ALL};

/// What an edit requires from the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChange {
    /// Kept in the draft; nothing to fetch.
    Staged,
    /// Committed; fetch this query now.
    Refetch(ListQuery),
}

pub const SORT_BY: &str = "sortBy";
pub const SORT_ORDER: &str = "sortOrder";

#[derive(Debug, Clone)]
pub struct FilterState {
    screen: &'static Screen,
    draft: BTreeMap<String, String>,
    applied: ListQuery,
}

impl FilterState {
    pub fn new(screen: &'static Screen, page_size: u32) -> Result<Self> {
        let mut applied = ListQuery::new(1, page_size)?;
        let defaults = Self::defaults(screen);
        applied.replace_filters(defaults.clone());
        if let Some((field, order)) = screen.default_sort {
            applied.set_sort(Some(field.to_string()), order);
        }
        Ok(Self {
            screen,
            draft: defaults,
            applied,
        })
    }

    fn defaults(screen: &Screen) -> BTreeMap<String, String> {
        let mut filters = BTreeMap::new();
        if let Some(status) = screen.default_status {
            filters.insert("status".to_string(), status.as_str().to_string());
        }
        filters
    }

    /// Edit one field. Sort keys update the sort instead of a filter.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> FilterChange {
        let value = value.into();
        match key {
            SORT_BY | SORT_ORDER => {
                self.set_sort_field(key, &value);
            }
            _ => {
                self.draft.insert(key.to_string(), value);
            }
        }
        if self.screen.is_live(key) {
            FilterChange::Refetch(self.commit())
        } else {
            FilterChange::Staged
        }
    }

    fn set_sort_field(&mut self, key: &str, value: &str) {
        let field = self.applied.sort_by().map(str::to_string);
        let order = self.applied.sort_order();
        if key == SORT_BY {
            let field = Some(value.to_string()).filter(|v| !v.is_empty());
            self.applied.set_sort(field, order);
        } else {
            self.applied
                .set_sort(field, value.parse().unwrap_or(SortOrder::default()));
        }
    }

    /// Commit the draft and return the query for page 1.
    pub fn apply(&mut self) -> ListQuery {
        self.commit()
    }

    fn commit(&mut self) -> ListQuery {
        self.applied.replace_filters(self.draft.clone());
        // page 1 is always valid
        let _ = self.applied.set_page(1);
        self.applied.clone()
    }

    /// Drop all edits and go back to the screen defaults.
    pub fn reset(&mut self) -> ListQuery {
        self.draft = Self::defaults(self.screen);
        let sort = self.screen.default_sort;
        self.applied.set_sort(
            sort.map(|(f, _)| f.to_string()),
            sort.map(|(_, o)| o).unwrap_or_default(),
        );
        self.commit()
    }

    /// Move to another page of the applied criteria; the draft is untouched.
    pub fn set_page(&mut self, page: u32) -> Result<ListQuery> {
        self.applied.set_page(page)?;
        Ok(self.applied.clone())
    }

    pub fn draft(&self, key: &str) -> Option<&str> {
        self.draft.get(key).map(String::as_str)
    }

    pub fn applied(&self) -> &ListQuery {
        &self.applied
    }

    /// Whether the draft differs from what the last fetch used.
    pub fn is_dirty(&self) -> bool {
        &self.draft != self.applied.filters()
    }

    pub fn active_status(&self) -> Option<ModerationStatus> {
        self.applied.status_filter()
    }

    /// Cycle the status selector: pending → approved → rejected → all.
    pub fn next_status_value(&self) -> &'static str {
        match self.draft("status") {
            Some("pending") => "approved",
            Some("approved") => "rejected",
            Some("rejected") => FILTER_ALL,
            _ => "pending",
        }
    }
}
