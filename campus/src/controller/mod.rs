//! The reusable list-with-moderation-actions controller.
//!
//! One [`ModerationController`] per screen owns the fetcher, filters,
//! selection, dialog and dispatcher. It performs no I/O itself: the owner
//! starts requests from the tickets / prepared actions it hands out and feeds
//! the results back, which lets several requests run at once. The async
//! helpers [`ModerationController::refresh`] and
//! [`ModerationController::perform`] drive a [`ModerationApi`] directly for
//! callers that do not need that.

pub mod dialog;
pub mod dispatch;
pub mod fetcher;
pub mod filter;
pub mod selection;

use std::future::Future;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::{CampusError, Result};
use crate::notice::{Notice, NoticeLevel};
use crate::rest::CampusHttpClient;
use crate::screen::Screen;
use crate::types::{ActionKind, DashboardSummary, ListQuery, ModerationSubject, Page};

pub use dialog::{Dialog, DialogController, DialogField};
pub use dispatch::{
    reconcile, row_update, ActionDispatcher, ActionOutcome, ActionRequest, PreparedAction,
    Reconciliation, RowUpdate, Target,
};
pub use fetcher::{FetchOutcome, FetchTicket, ListFetcher};
pub use filter::{FilterChange, FilterState};
pub use selection::SelectionSet;

/// Backend operations one screen needs.
pub trait ModerationApi<T> {
    fn fetch_page(&self, query: &ListQuery) -> impl Future<Output = Result<Page<T>>> + Send;

    fn perform(
        &self,
        action: &PreparedAction,
    ) -> impl Future<Output = Result<ActionOutcome<T>>> + Send;

    /// `Ok(None)` for screens without summary counts.
    fn summary(&self) -> impl Future<Output = Result<Option<DashboardSummary>>> + Send;
}

/// [`ModerationApi`] over HTTP for one screen.
#[derive(Debug, Clone)]
pub struct ScreenClient<T> {
    http: CampusHttpClient,
    screen: &'static Screen,
    _item: PhantomData<fn() -> T>,
}

impl<T> ScreenClient<T> {
    pub fn new(http: CampusHttpClient, screen: &'static Screen) -> Self {
        Self {
            http,
            screen,
            _item: PhantomData,
        }
    }

    pub fn screen(&self) -> &'static Screen {
        self.screen
    }

    pub fn http(&self) -> &CampusHttpClient {
        &self.http
    }
}

impl<T> ModerationApi<T> for ScreenClient<T>
where
    T: DeserializeOwned + Send + 'static,
{
    async fn fetch_page(&self, query: &ListQuery) -> Result<Page<T>> {
        self.http.list(self.screen, query).await
    }

    async fn perform(&self, action: &PreparedAction) -> Result<ActionOutcome<T>> {
        let kind = action.kind();
        if action.bulk {
            let response = match &action.request {
                ActionRequest::Approve { note } => note.clone().unwrap_or_default(),
                ActionRequest::Reject { reason, .. } => reason.clone(),
                _ => {
                    return Err(CampusError::Validation(format!(
                        "{kind} has no bulk variant"
                    )))
                }
            };
            let result = self
                .http
                .bulk(self.screen, kind, &action.targets, &response)
                .await?;
            return Ok(ActionOutcome::bulk(kind, result));
        }

        let id = action.target();
        let updated: Option<T> = match &action.request {
            ActionRequest::Approve { note } => {
                self.http.approve(self.screen, id, note.as_deref()).await?
            }
            ActionRequest::Reject {
                reason,
                detailed_reason,
            } => {
                self.http
                    .reject(self.screen, id, reason, detailed_reason.as_deref())
                    .await?
            }
            ActionRequest::Grade {
                marks,
                max_marks,
                feedback,
            } => {
                self.http
                    .grade(self.screen, id, *marks, *max_marks, feedback.as_deref())
                    .await?
            }
            ActionRequest::Edit { body } => self.http.update(self.screen, id, body).await?,
            ActionRequest::Delete => {
                self.http.delete_item(self.screen, id).await?;
                None
            }
        };
        Ok(ActionOutcome::single(kind, id, updated))
    }

    async fn summary(&self) -> Result<Option<DashboardSummary>> {
        if self.screen.summary_path.is_none() {
            return Ok(None);
        }
        self.http.summary(self.screen).await.map(Some)
    }
}

/// State of one moderation screen.
#[derive(Debug)]
pub struct ModerationController<T> {
    screen: &'static Screen,
    fetcher: ListFetcher<T>,
    filters: FilterState,
    selection: SelectionSet,
    dialog: DialogController,
    dispatcher: ActionDispatcher,
    summary: Option<DashboardSummary>,
    summary_stale: bool,
    notice: Option<Notice>,
}

impl<T: ModerationSubject> ModerationController<T> {
    pub fn new(screen: &'static Screen, page_size: u32) -> Result<Self> {
        Ok(Self {
            screen,
            fetcher: ListFetcher::new(),
            filters: FilterState::new(screen, page_size)?,
            selection: SelectionSet::new(),
            dialog: DialogController::new(),
            dispatcher: ActionDispatcher::new(),
            summary: None,
            summary_stale: screen.summary_path.is_some(),
            notice: None,
        })
    }

    // --- accessors ---

    pub fn screen(&self) -> &'static Screen {
        self.screen
    }

    pub fn page(&self) -> Option<&Page<T>> {
        self.fetcher.page()
    }

    pub fn is_loading(&self) -> bool {
        self.fetcher.is_loading()
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn dialog(&self) -> &DialogController {
        &self.dialog
    }

    pub fn dialog_mut(&mut self) -> &mut DialogController {
        &mut self.dialog
    }

    pub fn summary(&self) -> Option<&DashboardSummary> {
        self.summary.as_ref()
    }

    /// Latest notification: action results take precedence over fetch errors.
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref().or(self.fetcher.notice())
    }

    /// Show a notification raised outside the controller, e.g. unparsable
    /// input in a front end.
    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
        self.fetcher.dismiss_notice();
    }

    pub fn is_busy(&self, id: &str) -> bool {
        self.dispatcher.is_busy(id)
    }

    fn visible_ids(&self) -> Vec<String> {
        self.fetcher.page().map(Page::ids).unwrap_or_default()
    }

    // --- fetching ---

    /// Start a fetch of the applied criteria.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.fetcher.begin(self.filters.applied().clone())
    }

    pub fn settle_fetch(&mut self, ticket: &FetchTicket, result: Result<Page<T>>) -> FetchOutcome {
        let outcome = self.fetcher.settle(ticket, result);
        match outcome {
            FetchOutcome::Applied => {
                let visible = self.visible_ids();
                self.selection.retain_visible(&visible);
            }
            FetchOutcome::Failed if self.fetcher.page().is_none() => self.selection.clear(),
            _ => {}
        }
        outcome
    }

    /// Edit a filter field; live fields return a ticket to fetch right away.
    pub fn edit_filter(&mut self, key: &str, value: impl Into<String>) -> Option<FetchTicket> {
        match self.filters.set(key, value) {
            FilterChange::Staged => None,
            FilterChange::Refetch(query) => {
                debug!(screen = self.screen.name, key, "live filter changed");
                Some(self.fetcher.begin(query))
            }
        }
    }

    pub fn apply_filters(&mut self) -> FetchTicket {
        let query = self.filters.apply();
        info!(screen = self.screen.name, filters = ?query.filters(), "filters applied");
        self.fetcher.begin(query)
    }

    pub fn reset_filters(&mut self) -> FetchTicket {
        let query = self.filters.reset();
        self.fetcher.begin(query)
    }

    pub fn go_to_page(&mut self, page: u32) -> Result<FetchTicket> {
        let query = self.filters.set_page(page)?;
        Ok(self.fetcher.begin(query))
    }

    pub fn next_page(&mut self) -> Option<FetchTicket> {
        let page = self.fetcher.page()?;
        if !page.has_next() {
            return None;
        }
        let next = page.current_page + 1;
        self.go_to_page(next).ok()
    }

    pub fn prev_page(&mut self) -> Option<FetchTicket> {
        let page = self.fetcher.page()?;
        if !page.has_prev() {
            return None;
        }
        let prev = page.current_page - 1;
        self.go_to_page(prev).ok()
    }

    // --- selection ---

    pub fn toggle_select(&mut self, id: &str) -> bool {
        self.selection.toggle(id)
    }

    pub fn toggle_select_all(&mut self) {
        let visible = self.visible_ids();
        self.selection.toggle_all(&visible);
    }

    // --- actions ---

    /// Validate and guard an action. Validation failures become the current
    /// notice and nothing should be sent.
    pub fn prepare_action(
        &mut self,
        target: Target,
        request: ActionRequest,
    ) -> Result<PreparedAction> {
        let prepared =
            self.dispatcher
                .prepare(self.screen, self.fetcher.page(), target, request);
        if let Err(err) = &prepared {
            self.notice = Some(Notice::from_error(err));
        }
        prepared
    }

    /// Prepare a bulk action over the current selection.
    pub fn prepare_bulk(&mut self, request: ActionRequest) -> Result<PreparedAction> {
        let ids = self.selection.ids();
        self.prepare_action(Target::Many(ids), request)
    }

    /// Feed back the result of a prepared action.
    pub fn settle_action(
        &mut self,
        action: &PreparedAction,
        result: Result<ActionOutcome<T>>,
    ) -> Result<Reconciliation> {
        self.dispatcher.release(action);
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(screen = self.screen.name, kind = %action.kind(), error = %err, "action failed");
                self.notice = Some(Notice::from_error(&err));
                return Err(err);
            }
        };

        let active = self.filters.active_status();
        let mut rec = match self.fetcher.page_mut() {
            Some(page) => reconcile(page, active, &outcome),
            None => Reconciliation {
                needs_refetch: true,
                refresh_summary: outcome.kind.target_status().is_some(),
                ..Default::default()
            },
        };

        self.selection.deselect(&outcome.result.succeeded_ids);
        self.dialog.complete();

        if rec.needs_refetch {
            if let Some(page) = self.fetcher.page() {
                if page.items.is_empty() && page.current_page > 1 {
                    // the emptied page may no longer exist
                    if let Err(e) = self.filters.set_page(page.current_page - 1) {
                        warn!(error = %e, "could not step back from emptied page");
                    }
                }
            }
        }
        if rec.refresh_summary && self.screen.summary_path.is_some() {
            self.summary_stale = true;
        } else {
            rec.refresh_summary = false;
        }

        self.notice = Some(action_notice(&outcome));
        info!(
            screen = self.screen.name,
            kind = %outcome.kind,
            succeeded = outcome.result.succeeded_ids.len(),
            failed = outcome.result.failed_ids.len(),
            removed = rec.removed.len(),
            patched = rec.patched.len(),
            "action settled"
        );
        Ok(rec)
    }

    /// Whether summary counts should be (re)loaded. Clears the flag.
    pub fn take_summary_refresh(&mut self) -> bool {
        std::mem::take(&mut self.summary_stale)
    }

    pub fn apply_summary(&mut self, result: Result<Option<DashboardSummary>>) {
        match result {
            Ok(summary) => self.summary = summary,
            Err(err) => {
                warn!(screen = self.screen.name, error = %err, "summary refresh failed");
                self.summary_stale = true;
            }
        }
    }

    // --- async drivers ---

    /// Fetch the applied criteria and, if due, the summary.
    pub async fn refresh<A: ModerationApi<T>>(&mut self, api: &A) -> FetchOutcome {
        let ticket = self.begin_fetch();
        let result = api.fetch_page(&ticket.query).await;
        let outcome = self.settle_fetch(&ticket, result);
        if self.take_summary_refresh() {
            let summary = api.summary().await;
            self.apply_summary(summary);
        }
        outcome
    }

    /// Prepare, send and settle one action, then run dependent refreshes.
    pub async fn perform<A: ModerationApi<T>>(
        &mut self,
        api: &A,
        target: Target,
        request: ActionRequest,
    ) -> Result<Reconciliation> {
        let action = self.prepare_action(target, request)?;
        let result = api.perform(&action).await;
        let rec = self.settle_action(&action, result)?;
        if rec.needs_refetch {
            self.refresh(api).await;
        } else if self.take_summary_refresh() {
            let summary = api.summary().await;
            self.apply_summary(summary);
        }
        Ok(rec)
    }
}

fn action_notice<T>(outcome: &ActionOutcome<T>) -> Notice {
    let done = outcome.result.succeeded_ids.len();
    let failed = outcome.result.failed_ids.len();
    let verb = match outcome.kind {
        ActionKind::Approve => "Approved",
        ActionKind::Reject => "Rejected",
        ActionKind::Grade => "Graded",
        ActionKind::Edit => "Updated",
        ActionKind::Delete => "Deleted",
    };
    if let Some(msg) = &outcome.message {
        return Notice::success(msg.clone());
    }
    if failed == 0 {
        Notice::success(format!("{verb} {done} item(s)"))
    } else {
        Notice {
            level: NoticeLevel::Warning,
            text: format!("{verb} {done} item(s), {failed} failed and remain selected"),
            requires_login: false,
        }
    }
}
