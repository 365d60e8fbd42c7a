use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CampusError, Result};
use crate::types::subject::ModerationSubject;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub subject: String,
    pub total_marks: u32,
    pub duration_minutes: u32,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_published: bool,
}

impl ModerationSubject for Exam {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Body of `POST /admin/exams` and `PUT /admin/exams/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExam {
    pub title: String,
    pub subject: String,
    pub total_marks: u32,
    pub duration_minutes: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl NewExam {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(CampusError::Validation("Exam title is required".into()));
        }
        if self.total_marks == 0 {
            return Err(CampusError::Validation(
                "Total marks must be greater than zero".into(),
            ));
        }
        if self.duration_minutes == 0 {
            return Err(CampusError::Validation(
                "Duration must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exam() -> NewExam {
        NewExam {
            title: "Data Structures Midterm".into(),
            subject: "CS201".into(),
            total_marks: 100,
            duration_minutes: 90,
            scheduled_at: None,
        }
    }

    #[test]
    fn test_valid_exam() {
        assert!(exam().validate().is_ok());
    }

    #[test]
    fn test_blank_title_rejected() {
        let e = NewExam {
            title: "  ".into(),
            ..exam()
        };
        assert!(e.validate().is_err());
    }

    #[test]
    fn test_zero_marks_or_duration_rejected() {
        assert!(NewExam {
            total_marks: 0,
            ..exam()
        }
        .validate()
        .is_err());
        assert!(NewExam {
            duration_minutes: 0,
            ..exam()
        }
        .validate()
        .is_err());
    }
}
