pub mod bulk;
pub mod certificate;
pub mod criteria;
pub mod enums;
pub mod envelope;
pub mod exam;
pub mod page;
pub mod promotion;
pub mod subject;
pub mod submission;
pub mod summary;
pub mod year_change;

pub use bulk::{BulkActionResult, BulkReport};
pub use certificate::{Certificate, CertificateRequest};
pub use criteria::{percentage, GradeBand, GradeCriteria};
pub use enums::{ActionKind, ModerationStatus, SortOrder};
pub use envelope::Envelope;
pub use exam::{Exam, NewExam};
pub use page::{ListData, ListQuery, Page, Pagination, FILTER_ALL};
pub use promotion::PromotionRequest;
pub use subject::ModerationSubject;
pub use submission::Submission;
pub use summary::DashboardSummary;
pub use year_change::YearChangeRequest;
