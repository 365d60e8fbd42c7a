pub mod auth;
pub mod config;
pub mod controller;
pub mod error;
pub mod notice;
pub mod rest;
pub mod screen;
pub mod types;
pub mod validation;

// ---- Top-level re-exports for ergonomic usage ----

// Config + auth + errors
pub use auth::AuthContext;
pub use config::CampusConfig;
pub use error::{CampusError, ErrorClass, Result};
pub use notice::{Notice, NoticeLevel};

// REST client
pub use rest::CampusHttpClient;

// Screens
pub use screen::Screen;

// Controller
pub use controller::{
    ActionOutcome, ActionRequest, Dialog, FetchOutcome, FetchTicket, ModerationApi,
    ModerationController, PreparedAction, Reconciliation, ScreenClient, Target,
};

// Core enums
pub use types::{ActionKind, ModerationStatus, SortOrder};

// Pagination
pub use types::{ListQuery, Page, Pagination};

// Records
pub use types::{
    Certificate, CertificateRequest, DashboardSummary, Exam, GradeCriteria, NewExam,
    PromotionRequest, Submission, YearChangeRequest,
};

// Bulk + envelope
pub use types::{BulkActionResult, Envelope, ModerationSubject};
