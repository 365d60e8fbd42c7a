use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CampusError, Result};

/// Body of `POST /admin/certificates/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRequest {
    pub student_id: String,
    pub criteria_id: String,
}

impl CertificateRequest {
    pub fn validate(&self) -> Result<()> {
        if self.student_id.trim().is_empty() {
            return Err(CampusError::Validation("Student is required".into()));
        }
        if self.criteria_id.trim().is_empty() {
            return Err(CampusError::Validation("Grade criteria is required".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    #[serde(alias = "_id")]
    pub id: String,
    pub student_id: String,
    #[serde(default)]
    pub student_name: Option<String>,
    pub grade: String,
    #[serde(default)]
    pub percentage: Option<Decimal>,
    #[serde(default)]
    pub issued_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub download_url: Option<String>,
}
