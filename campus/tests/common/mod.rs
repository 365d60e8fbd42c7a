//! In-memory backend shared by the controller tests.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use campus::controller::{ActionOutcome, ActionRequest, ModerationApi, PreparedAction};
use campus::types::{BulkActionResult, DashboardSummary, ListQuery, Page, PromotionRequest};
use campus::{CampusError, ModerationStatus, Result};

pub fn promotion(id: &str, status: ModerationStatus) -> PromotionRequest {
    PromotionRequest {
        id: id.to_string(),
        student_name: format!("Student {id}"),
        email: format!("{id}@example.edu"),
        batch: Some("2024-A".to_string()),
        current_year: Some(2),
        status,
        rejection_reason: None,
        created_at: None,
    }
}

#[derive(Default)]
pub struct MemoryBackend {
    rows: Mutex<Vec<PromotionRequest>>,
    /// Ids the backend refuses in bulk requests.
    refuse: Mutex<BTreeSet<String>>,
    fail_next: Mutex<Option<CampusError>>,
    pub fetches: AtomicUsize,
    pub actions: AtomicUsize,
    pub summaries: AtomicUsize,
}

impl MemoryBackend {
    pub fn with_pending(n: usize) -> Self {
        let rows = (1..=n)
            .map(|i| promotion(&format!("p{i:02}"), ModerationStatus::Pending))
            .collect();
        Self {
            rows: Mutex::new(rows),
            ..Default::default()
        }
    }

    pub fn refuse(&self, id: &str) {
        self.refuse.lock().unwrap().insert(id.to_string());
    }

    pub fn fail_next(&self, err: CampusError) {
        *self.fail_next.lock().unwrap() = Some(err);
    }

    pub fn status_of(&self, id: &str) -> Option<ModerationStatus> {
        let rows = self.rows.lock().unwrap();
        rows.iter().find(|r| r.id == id).map(|r| r.status)
    }

    pub fn count(&self, counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    fn take_failure(&self) -> Option<CampusError> {
        self.fail_next.lock().unwrap().take()
    }

    fn set_status(&self, id: &str, status: ModerationStatus) -> Option<PromotionRequest> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows.iter_mut().find(|r| r.id == id)?;
        row.status = status;
        Some(row.clone())
    }
}

impl ModerationApi<PromotionRequest> for MemoryBackend {
    async fn fetch_page(&self, query: &ListQuery) -> Result<Page<PromotionRequest>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        let rows = self.rows.lock().unwrap();
        let matching: Vec<_> = rows
            .iter()
            .filter(|r| query.status_filter().map_or(true, |s| r.status == s))
            .cloned()
            .collect();
        let total = matching.len() as u64;
        let limit = query.limit();
        let start = ((query.page() - 1) * limit) as usize;
        let items = matching
            .into_iter()
            .skip(start)
            .take(limit as usize)
            .collect();
        Ok(Page {
            items,
            current_page: query.page(),
            total_pages: total.div_ceil(u64::from(limit)) as u32,
            total_count: total,
            limit,
        })
    }

    async fn perform(&self, action: &PreparedAction) -> Result<ActionOutcome<PromotionRequest>> {
        self.actions.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        let kind = action.kind();
        let status = match &action.request {
            ActionRequest::Approve { .. } => ModerationStatus::Approved,
            ActionRequest::Reject { .. } => ModerationStatus::Rejected,
            other => {
                return Err(CampusError::Application(format!(
                    "unsupported {:?}",
                    other.kind()
                )))
            }
        };

        if action.bulk {
            let refused = self.refuse.lock().unwrap().clone();
            let mut done = Vec::new();
            for id in &action.targets {
                if !refused.contains(id) && self.set_status(id, status).is_some() {
                    done.push(id.clone());
                }
            }
            let result = BulkActionResult::from_report(&action.targets, Some(done.as_slice()));
            return Ok(ActionOutcome::bulk(kind, result));
        }

        let id = action.target();
        let updated = self.set_status(id, status);
        Ok(ActionOutcome::single(kind, id, updated))
    }

    async fn summary(&self) -> Result<Option<DashboardSummary>> {
        self.summaries.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().unwrap();
        let count = |s: ModerationStatus| rows.iter().filter(|r| r.status == s).count() as u64;
        Ok(Some(DashboardSummary {
            pending: count(ModerationStatus::Pending),
            approved: count(ModerationStatus::Approved),
            rejected: count(ModerationStatus::Rejected),
            total: rows.len() as u64,
        }))
    }
}
