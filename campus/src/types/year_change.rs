use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::enums::ModerationStatus;
use crate::types::subject::ModerationSubject;

/// A student's request to move to a different academic year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearChangeRequest {
    #[serde(alias = "_id")]
    pub id: String,
    pub student_name: String,
    #[serde(default)]
    pub email: String,
    pub current_year: u8,
    pub requested_year: u8,
    #[serde(default)]
    pub reason: Option<String>,
    pub status: ModerationStatus,
    #[serde(default)]
    pub admin_response: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl ModerationSubject for YearChangeRequest {
    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> Option<ModerationStatus> {
        Some(self.status)
    }

    fn set_status(&mut self, status: ModerationStatus) {
        self.status = status;
    }
}
