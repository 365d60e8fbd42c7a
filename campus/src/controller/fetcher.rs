//! Sequenced page fetching.
//!
//! Requests are not cancelled, so responses can arrive in any order. Each
//! request gets a monotonically increasing id; only the response to the most
//! recently issued request is applied and everything older is dropped.

use tracing::{debug, warn};

use crate::error::CampusError;
use crate::notice::Notice;
use crate::types::{ListQuery, Page};

/// Handle for one issued request. Hand it back to [`ListFetcher::settle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub id: u64,
    pub query: ListQuery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page replaced the displayed one.
    Applied,
    /// A newer request was issued meanwhile; the response was dropped.
    Stale,
    /// The latest request failed; previous data kept (or cleared on auth).
    Failed,
}

#[derive(Debug)]
pub struct ListFetcher<T> {
    page: Option<Page<T>>,
    latest_issued: u64,
    loading: bool,
    notice: Option<Notice>,
}

impl<T> Default for ListFetcher<T> {
    fn default() -> Self {
        Self {
            page: None,
            latest_issued: 0,
            loading: false,
            notice: None,
        }
    }
}

impl<T> ListFetcher<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new request id for `query` and raise the loading flag.
    pub fn begin(&mut self, query: ListQuery) -> FetchTicket {
        self.latest_issued += 1;
        self.loading = true;
        debug!(id = self.latest_issued, page = query.page(), "fetch issued");
        FetchTicket {
            id: self.latest_issued,
            query,
        }
    }

    /// Apply the result of a request issued by [`ListFetcher::begin`].
    pub fn settle(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Page<T>, CampusError>,
    ) -> FetchOutcome {
        if ticket.id < self.latest_issued {
            debug!(
                id = ticket.id,
                latest = self.latest_issued,
                "stale response dropped"
            );
            return FetchOutcome::Stale;
        }

        self.loading = false;
        match result {
            Ok(page) => {
                self.page = Some(page);
                self.notice = None;
                FetchOutcome::Applied
            }
            Err(err) => {
                warn!(error = %err, page = ticket.query.page(), "fetch failed");
                if err.is_auth() {
                    self.page = None;
                }
                self.notice = Some(Notice::from_error(&err));
                FetchOutcome::Failed
            }
        }
    }

    pub fn page(&self) -> Option<&Page<T>> {
        self.page.as_ref()
    }

    pub fn page_mut(&mut self) -> Option<&mut Page<T>> {
        self.page.as_mut()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }
}
