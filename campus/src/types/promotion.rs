use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::enums::ModerationStatus;
use crate::types::subject::ModerationSubject;

/// A student's registration awaiting promotion to a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionRequest {
    #[serde(alias = "_id")]
    pub id: String,
    pub student_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub batch: Option<String>,
    #[serde(default)]
    pub current_year: Option<u8>,
    pub status: ModerationStatus,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl ModerationSubject for PromotionRequest {
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
