//! Local checks that run before any mutating request is sent.

use rust_decimal::Decimal;

use crate::error::{CampusError, Result};
use crate::types::{ActionKind, ModerationStatus};

/// Upper mark bound when a task does not declare one.
pub const DEFAULT_MAX_MARKS: Decimal = Decimal::ONE_HUNDRED;

/// A rejection reason must contain something other than whitespace.
pub fn require_reason(reason: &str) -> Result<String> {
    let trimmed = reason.trim();
    if trimmed.is_empty() {
        return Err(CampusError::Validation(
            "Rejection reason is required".into(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Marks must lie in `[0, max_marks]`; `max_marks` defaults to 100.
pub fn check_marks(marks: Decimal, max_marks: Option<Decimal>) -> Result<Decimal> {
    let max = max_marks.unwrap_or(DEFAULT_MAX_MARKS);
    if max <= Decimal::ZERO {
        return Err(CampusError::Validation(format!(
            "Maximum marks must be positive, got {max}"
        )));
    }
    if marks < Decimal::ZERO || marks > max {
        return Err(CampusError::Validation(format!(
            "Marks must be between 0 and {max}"
        )));
    }
    Ok(marks)
}

/// Reject actions that would move a known subject along a forbidden edge.
/// Subjects without a status (or unknown locally) pass.
pub fn check_transition(current: Option<ModerationStatus>, kind: ActionKind) -> Result<()> {
    let (Some(current), Some(next)) = (current, kind.target_status()) else {
        return Ok(());
    };
    if current.can_transition_to(next) {
        Ok(())
    } else {
        Err(CampusError::Validation(format!(
            "Cannot {kind} a {current} item"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reason_blank_variants() {
        assert!(require_reason("").is_err());
        assert!(require_reason("   ").is_err());
        assert!(require_reason("\t\n").is_err());
        assert_eq!(
            require_reason("  Invalid documents ").unwrap(),
            "Invalid documents"
        );
    }

    #[test]
    fn test_marks_bounds_inclusive() {
        assert!(check_marks(dec!(0), None).is_ok());
        assert!(check_marks(dec!(100), None).is_ok());
        assert!(check_marks(dec!(100.01), None).is_err());
        assert!(check_marks(dec!(-0.5), None).is_err());
        assert!(check_marks(dec!(25), Some(dec!(20))).is_err());
        assert!(check_marks(dec!(20), Some(dec!(20))).is_ok());
    }

    #[test]
    fn test_marks_bad_max() {
        assert!(check_marks(dec!(0), Some(dec!(0))).is_err());
    }

    #[test]
    fn test_transition_checks() {
        assert!(check_transition(Some(ModerationStatus::Pending), ActionKind::Approve).is_ok());
        assert!(check_transition(Some(ModerationStatus::Approved), ActionKind::Reject).is_err());
        assert!(check_transition(Some(ModerationStatus::Approved), ActionKind::Delete).is_ok());
        assert!(check_transition(None, ActionKind::Approve).is_ok());
        assert!(check_transition(Some(ModerationStatus::Graded), ActionKind::Grade).is_ok());
    }
}
