//! Per-screen parameters for the moderation controller.
//!
//! Each dashboard screen is one [`Screen`] value; the controller and REST
//! helpers read everything screen-specific from it.

use crate::types::{ActionKind, ModerationStatus, SortOrder};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    /// Short name used on the command line.
    pub name: &'static str,
    pub title: &'static str,
    /// Resource path, e.g. `/admin/student-promotions`.
    pub resource: &'static str,
    /// Row actions the screen offers.
    pub actions: &'static [ActionKind],
    /// Whether bulk approve / reject over the selection is offered.
    pub bulk: bool,
    /// Filters that refetch as soon as they change.
    pub live_filters: &'static [&'static str],
    /// Filters that wait for an explicit apply.
    pub staged_filters: &'static [&'static str],
    pub default_status: Option<ModerationStatus>,
    pub default_sort: Option<(&'static str, SortOrder)>,
    /// Endpoint of the counts shown above the list.
    pub summary_path: Option<&'static str>,
}

impl Screen {
    pub fn supports(&self, kind: ActionKind) -> bool {
        self.actions.contains(&kind)
    }

    pub fn is_live(&self, key: &str) -> bool {
        self.live_filters.contains(&key)
    }

    pub fn knows_filter(&self, key: &str) -> bool {
        self.is_live(key) || self.staged_filters.contains(&key)
    }

    pub fn item_path(&self, id: &str) -> String {
        format!("{}/{id}", self.resource)
    }

    pub fn action_path(&self, id: &str, kind: ActionKind) -> String {
        format!("{}/{id}/{}", self.resource, kind.as_str())
    }

    pub fn bulk_path(&self, kind: ActionKind) -> String {
        format!("{}/bulk-{}", self.resource, kind.as_str())
    }
}

pub const EXAMS: Screen = Screen {
    name: "exams",
    title: "Exams",
    resource: "/admin/exams",
    actions: &[ActionKind::Edit, ActionKind::Delete],
    bulk: false,
    live_filters: &["sortBy", "sortOrder"],
    staged_filters: &["search"],
    default_status: None,
    default_sort: Some(("scheduledAt", SortOrder::Desc)),
    summary_path: None,
};

pub const PROMOTIONS: Screen = Screen {
    name: "promotions",
    title: "Student Promotions",
    resource: "/admin/student-promotions",
    actions: &[ActionKind::Approve, ActionKind::Reject],
    bulk: true,
    live_filters: &["status", "sortBy", "sortOrder"],
    staged_filters: &["search", "batch"],
    default_status: Some(ModerationStatus::Pending),
    default_sort: Some(("createdAt", SortOrder::Desc)),
    summary_path: Some("/admin/student-promotions/stats"),
};

pub const YEAR_CHANGES: Screen = Screen {
    name: "year-changes",
    title: "Year Change Requests",
    resource: "/admin/year-change-requests",
    actions: &[ActionKind::Approve, ActionKind::Reject],
    bulk: true,
    live_filters: &["status", "sortBy", "sortOrder"],
    staged_filters: &["search", "days"],
    default_status: Some(ModerationStatus::Pending),
    default_sort: Some(("createdAt", SortOrder::Desc)),
    summary_path: Some("/admin/year-change-requests/stats"),
};

pub const SUBMISSIONS: Screen = Screen {
    name: "submissions",
    title: "Task Submissions",
    resource: "/mentor/submissions",
    actions: &[ActionKind::Grade],
    bulk: false,
    live_filters: &["status", "sortBy", "sortOrder"],
    staged_filters: &["search"],
    default_status: Some(ModerationStatus::Pending),
    default_sort: Some(("submittedAt", SortOrder::Asc)),
    summary_path: Some("/mentor/submissions/stats"),
};

pub const GRADE_CRITERIA: Screen = Screen {
    name: "grade-criteria",
    title: "Grade Criteria",
    resource: "/admin/grade-criteria",
    actions: &[ActionKind::Edit, ActionKind::Delete],
    bulk: false,
    live_filters: &[],
    staged_filters: &["search"],
    default_status: None,
    default_sort: None,
    summary_path: None,
};

pub const ALL: &[&Screen] = &[&EXAMS, &PROMOTIONS, &YEAR_CHANGES, &SUBMISSIONS, &GRADE_CRITERIA];

pub fn by_name(name: &str) -> Option<&'static Screen> {
    ALL.iter().copied().find(|s| s.name == name)
}

/// Path that issues certificates.
pub const CERTIFICATE_GENERATE_PATH: &str = "/admin/certificates/generate";
