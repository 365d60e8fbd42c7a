use rust_decimal::Decimal;

use crate::types::enums::ModerationStatus;

/// A record shown in a moderation list.
///
/// Records without a moderation status (exams, grade criteria) keep the
/// default `status` and can only be edited or deleted.
pub trait ModerationSubject: Clone {
    fn id(&self) -> &str;

    fn status(&self) -> Option<ModerationStatus> {
        None
    }

    fn set_status(&mut self, _status: ModerationStatus) {}

    /// Upper bound for a grade on this record, if it carries one.
    fn max_marks(&self) -> Option<Decimal> {
        None
    }
}
