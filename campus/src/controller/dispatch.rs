//! Validating, guarding and reconciling mutating actions.
//!
//! [`ActionDispatcher::prepare`] does all local checks and marks the targets
//! busy; the caller performs the request and hands the result to the
//! controller, which calls [`reconcile`] on success and always releases the
//! targets.

use std::collections::HashSet;

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{CampusError, Result};
use crate::screen::Screen;
use crate::types::{ActionKind, BulkActionResult, ModerationStatus, ModerationSubject, Page};
use crate::validation::{check_marks, check_transition, require_reason};

/// Payload of one action as entered by the user.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionRequest {
    Approve {
        note: Option<String>,
    },
    Reject {
        reason: String,
        detailed_reason: Option<String>,
    },
    Grade {
        marks: Decimal,
        max_marks: Option<Decimal>,
        feedback: Option<String>,
    },
    Edit {
        body: serde_json::Value,
    },
    Delete,
}

impl ActionRequest {
    pub fn kind(&self) -> ActionKind {
        match self {
            ActionRequest::Approve { .. } => ActionKind::Approve,
            ActionRequest::Reject { .. } => ActionKind::Reject,
            ActionRequest::Grade { .. } => ActionKind::Grade,
            ActionRequest::Edit { .. } => ActionKind::Edit,
            ActionRequest::Delete => ActionKind::Delete,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    One(String),
    /// Bulk action over the selection.
    Many(Vec<String>),
}

/// An action that passed local validation and holds the in-flight guard.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedAction {
    pub request: ActionRequest,
    pub targets: Vec<String>,
    pub bulk: bool,
}

impl PreparedAction {
    pub fn kind(&self) -> ActionKind {
        self.request.kind()
    }

    /// The single target of a non-bulk action.
    pub fn target(&self) -> &str {
        self.targets.first().map(String::as_str).unwrap_or_default()
    }
}

/// Result of a successful request.
#[derive(Debug, Clone)]
pub struct ActionOutcome<T> {
    pub kind: ActionKind,
    pub result: BulkActionResult,
    /// Records the backend returned, used to patch rows in place.
    pub updated: Vec<T>,
    pub message: Option<String>,
}

impl<T> ActionOutcome<T> {
    pub fn single(kind: ActionKind, id: &str, updated: Option<T>) -> Self {
        Self {
            kind,
            result: BulkActionResult::all_succeeded(&[id.to_string()]),
            updated: updated.into_iter().collect(),
            message: None,
        }
    }

    pub fn bulk(kind: ActionKind, result: BulkActionResult) -> Self {
        Self {
            kind,
            result,
            updated: Vec::new(),
            message: None,
        }
    }
}

/// What happened to the displayed page after an action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub removed: Vec<String>,
    pub patched: Vec<String>,
    /// The page can no longer be trusted and must be refetched.
    pub needs_refetch: bool,
    /// Summary counts changed.
    pub refresh_summary: bool,
}

/// How a row reacts to a successful status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowUpdate {
    Remove,
    Patch,
}

/// Remove when the active status filter no longer matches the new status,
/// patch in place otherwise (including the unfiltered "all" view).
pub fn row_update(
    active_filter: Option<ModerationStatus>,
    new_status: ModerationStatus,
) -> RowUpdate {
    match active_filter {
        Some(filter) if filter != new_status => RowUpdate::Remove,
        _ => RowUpdate::Patch,
    }
}

/// Apply a successful outcome to the displayed page.
pub fn reconcile<T: ModerationSubject>(
    page: &mut Page<T>,
    active_filter: Option<ModerationStatus>,
    outcome: &ActionOutcome<T>,
) -> Reconciliation {
    let mut rec = Reconciliation::default();

    for id in &outcome.result.succeeded_ids {
        let update = match (outcome.kind, outcome.kind.target_status()) {
            (ActionKind::Delete, _) => RowUpdate::Remove,
            (_, Some(status)) => row_update(active_filter, status),
            (_, None) => RowUpdate::Patch,
        };

        match update {
            RowUpdate::Remove => {
                if page.remove(id) {
                    rec.removed.push(id.clone());
                }
            }
            RowUpdate::Patch => {
                let returned = outcome.updated.iter().find(|u| u.id() == id);
                let patched = match (returned, outcome.kind.target_status()) {
                    (Some(item), _) => page.replace(item.clone()),
                    (None, Some(status)) => page.set_status(id, status),
                    (None, None) => {
                        rec.needs_refetch = true;
                        false
                    }
                };
                if patched {
                    rec.patched.push(id.clone());
                }
            }
        }
    }

    if page.items.is_empty() && page.total_count > 0 {
        rec.needs_refetch = true;
    }
    rec.refresh_summary =
        outcome.kind.target_status().is_some() || outcome.kind == ActionKind::Delete;
    rec
}

#[derive(Debug, Default)]
pub struct ActionDispatcher {
    in_flight: HashSet<String>,
}

impl ActionDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `request` against `screen` and the displayed rows and take the
    /// in-flight guard for its targets. No I/O happens here.
    ///
    /// # Errors
    ///
    /// `CampusError::Validation` for unsupported actions, blank reasons,
    /// out-of-range marks, empty selections and forbidden transitions;
    /// `CampusError::InFlight` if any target already has a request running.
    pub fn prepare<T: ModerationSubject>(
        &mut self,
        screen: &Screen,
        page: Option<&Page<T>>,
        target: Target,
        request: ActionRequest,
    ) -> Result<PreparedAction> {
        let kind = request.kind();
        if !screen.supports(kind) {
            return Err(CampusError::Validation(format!(
                "{} does not support {kind}",
                screen.title
            )));
        }

        let (targets, bulk) = match target {
            Target::One(id) => (vec![id], false),
            Target::Many(ids) => {
                if !screen.bulk || !matches!(kind, ActionKind::Approve | ActionKind::Reject) {
                    return Err(CampusError::Validation(format!(
                        "bulk {kind} is not available on {}",
                        screen.title
                    )));
                }
                if ids.is_empty() {
                    return Err(CampusError::Validation("No items selected".into()));
                }
                (ids, true)
            }
        };

        let request = normalize(with_known_max(request, page, &targets))?;

        if let Some(page) = page {
            for id in &targets {
                let current = page.find(id).and_then(|item| item.status());
                check_transition(current, kind)?;
            }
        }

        if let Some(busy) = targets.iter().find(|id| self.in_flight.contains(*id)) {
            return Err(CampusError::InFlight(busy.clone()));
        }
        for id in &targets {
            self.in_flight.insert(id.clone());
        }
        debug!(%kind, targets = targets.len(), bulk, "action prepared");

        Ok(PreparedAction {
            request,
            targets,
            bulk,
        })
    }

    /// Drop the in-flight guard once the request settled, either way.
    pub fn release(&mut self, action: &PreparedAction) {
        for id in &action.targets {
            self.in_flight.remove(id);
        }
    }

    pub fn is_busy(&self, id: &str) -> bool {
        self.in_flight.contains(id)
    }

    pub fn has_pending(&self) -> bool {
        !self.in_flight.is_empty()
    }
}

/// Take the grade bound from the displayed record when the request has none.
fn with_known_max<T: ModerationSubject>(
    request: ActionRequest,
    page: Option<&Page<T>>,
    targets: &[String],
) -> ActionRequest {
    match request {
        ActionRequest::Grade {
            marks,
            max_marks: None,
            feedback,
        } => ActionRequest::Grade {
            marks,
            max_marks: page
                .zip(targets.first())
                .and_then(|(page, id)| page.find(id))
                .and_then(ModerationSubject::max_marks),
            feedback,
        },
        other => other,
    }
}

/// Validate and trim the user's input.
fn normalize(request: ActionRequest) -> Result<ActionRequest> {
    Ok(match request {
        ActionRequest::Reject {
            reason,
            detailed_reason,
        } => ActionRequest::Reject {
            reason: require_reason(&reason)?,
            detailed_reason: detailed_reason
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
        },
        ActionRequest::Grade {
            marks,
            max_marks,
            feedback,
        } => ActionRequest::Grade {
            marks: check_marks(marks, max_marks)?,
            max_marks,
            feedback: feedback
                .map(|f| f.trim().to_string())
                .filter(|f| !f.is_empty()),
        },
        ActionRequest::Approve { note } => ActionRequest::Approve {
            note: note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
        },
        other => other,
    })
}
