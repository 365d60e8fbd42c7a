use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::enums::ModerationStatus;
use crate::types::subject::ModerationSubject;

/// A task submission a mentor grades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    #[serde(alias = "_id")]
    pub id: String,
    pub student_name: String,
    pub task_title: String,
    #[serde(default)]
    pub repo_url: Option<String>,
    pub status: ModerationStatus,
    #[serde(default)]
    pub marks: Option<Decimal>,
    #[serde(default)]
    pub max_marks: Option<Decimal>,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

impl ModerationSubject for Submission {
    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> Option<ModerationStatus> {
        Some(self.status)
    }

    fn set_status(&mut self, status: ModerationStatus) {
        self.status = status;
    }

    fn max_marks(&self) -> Option<Decimal> {
        self.max_marks
    }
}
