use reqwest::Method;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use crate::error::{CampusError, Result};
use crate::rest::CampusHttpClient;
use crate::screen::{Screen, CERTIFICATE_GENERATE_PATH, EXAMS, GRADE_CRITERIA};
use crate::types::*;
use crate::validation::{check_marks, require_reason};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApproveBody<'a> {
    admin_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    notification_message: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RejectBody<'a> {
    reason: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detailed_reason: Option<&'a str>,
    admin_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BulkBody<'a> {
    admin_id: &'a str,
    admin_response: &'a str,
    ids: &'a [String],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GradeBody<'a> {
    marks: Decimal,
    max_marks: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    feedback: Option<&'a str>,
    graded_by: &'a str,
}

/// Treat an empty or whitespace-only optional string as absent.
fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

impl CampusHttpClient {
    // --- Lists ---

    /// GET /{resource}?page=&limit=&... - One page of a screen's records.
    pub async fn list<T: DeserializeOwned>(
        &self,
        screen: &Screen,
        query: &ListQuery,
    ) -> Result<Page<T>> {
        let data: ListData<T> = self
            .get(screen.resource, &query.to_params())
            .await?
            .into_data()?;
        Ok(Page::from_list(data))
    }

    /// GET /{resource}/{id}
    pub async fn fetch_item<T: DeserializeOwned>(&self, screen: &Screen, id: &str) -> Result<T> {
        self.get(&screen.item_path(id), &[]).await?.into_data()
    }

    /// GET /{resource}/stats - Counts for the screen header.
    pub async fn summary(&self, screen: &Screen) -> Result<DashboardSummary> {
        let path = screen.summary_path.ok_or_else(|| {
            CampusError::Config(format!("screen {} has no summary", screen.name))
        })?;
        self.get(path, &[]).await?.into_data()
    }

    // --- Moderation ---

    /// PATCH /{resource}/{id}/approve
    pub async fn approve<T: DeserializeOwned>(
        &self,
        screen: &Screen,
        id: &str,
        notification: Option<&str>,
    ) -> Result<Option<T>> {
        let body = ApproveBody {
            admin_id: &self.auth().admin_id,
            notification_message: non_blank(notification),
        };
        let (data, _) = self
            .send_json(
                Method::PATCH,
                &screen.action_path(id, ActionKind::Approve),
                &body,
            )
            .await?
            .into_result()?;
        info!(screen = screen.name, id, "approved");
        Ok(data)
    }

    /// PATCH /{resource}/{id}/reject
    ///
    /// # Errors
    ///
    /// Returns `CampusError::Validation` without sending anything if `reason`
    /// is blank.
    pub async fn reject<T: DeserializeOwned>(
        &self,
        screen: &Screen,
        id: &str,
        reason: &str,
        detailed_reason: Option<&str>,
    ) -> Result<Option<T>> {
        let reason = require_reason(reason)?;
        let body = RejectBody {
            reason: &reason,
            detailed_reason: non_blank(detailed_reason),
            admin_id: &self.auth().admin_id,
        };
        let (data, _) = self
            .send_json(
                Method::PATCH,
                &screen.action_path(id, ActionKind::Reject),
                &body,
            )
            .await?
            .into_result()?;
        info!(screen = screen.name, id, "rejected");
        Ok(data)
    }

    /// PATCH /{resource}/bulk-approve or /bulk-reject
    ///
    /// `admin_response` is the rejection reason for bulk reject and must then
    /// be non-blank.
    pub async fn bulk(
        &self,
        screen: &Screen,
        kind: ActionKind,
        ids: &[String],
        admin_response: &str,
    ) -> Result<BulkActionResult> {
        let response = match kind {
            ActionKind::Approve => admin_response.trim().to_string(),
            ActionKind::Reject => require_reason(admin_response)?,
            other => {
                return Err(CampusError::Validation(format!(
                    "{other} has no bulk variant"
                )))
            }
        };
        if ids.is_empty() {
            return Err(CampusError::Validation("No items selected".into()));
        }
        let body = BulkBody {
            admin_id: &self.auth().admin_id,
            admin_response: &response,
            ids,
        };
        let (report, _): (Option<BulkReport>, _) = self
            .send_json(Method::PATCH, &screen.bulk_path(kind), &body)
            .await?
            .into_result()?;
        let result =
            BulkActionResult::from_report(ids, report.as_ref().and_then(BulkReport::reported));
        info!(
            screen = screen.name,
            %kind,
            succeeded = result.succeeded_ids.len(),
            failed = result.failed_ids.len(),
            "bulk action"
        );
        Ok(result)
    }

    /// PUT /{resource}/{id} with a grade.
    ///
    /// # Errors
    ///
    /// Returns `CampusError::Validation` without sending anything if `marks`
    /// lies outside `[0, max_marks]`.
    pub async fn grade<T: DeserializeOwned>(
        &self,
        screen: &Screen,
        id: &str,
        marks: Decimal,
        max_marks: Option<Decimal>,
        feedback: Option<&str>,
    ) -> Result<Option<T>> {
        let marks = check_marks(marks, max_marks)?;
        let body = GradeBody {
            marks,
            max_marks: max_marks.unwrap_or(crate::validation::DEFAULT_MAX_MARKS),
            feedback: non_blank(feedback),
            graded_by: &self.auth().admin_id,
        };
        let (data, _) = self
            .send_json(Method::PUT, &screen.item_path(id), &body)
            .await?
            .into_result()?;
        info!(screen = screen.name, id, %marks, "graded");
        Ok(data)
    }

    // --- CRUD ---

    /// POST /{resource}
    pub async fn create<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        screen: &Screen,
        body: &B,
    ) -> Result<T> {
        self.send_json(Method::POST, screen.resource, body)
            .await?
            .into_data()
    }

    /// PUT /{resource}/{id}
    pub async fn update<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        screen: &Screen,
        id: &str,
        body: &B,
    ) -> Result<Option<T>> {
        let (data, _) = self
            .send_json(Method::PUT, &screen.item_path(id), body)
            .await?
            .into_result()?;
        Ok(data)
    }

    /// DELETE /{resource}/{id}
    pub async fn delete_item(&self, screen: &Screen, id: &str) -> Result<()> {
        let env: Envelope<serde_json::Value> = self.delete(&screen.item_path(id)).await?;
        env.into_result()?;
        info!(screen = screen.name, id, "deleted");
        Ok(())
    }

    // --- Exams ---

    /// POST /admin/exams after local validation.
    pub async fn create_exam(&self, exam: &NewExam) -> Result<Exam> {
        exam.validate()?;
        let created: Exam = self.create(&EXAMS, exam).await?;
        info!(id = %created.id, title = %created.title, "exam created");
        Ok(created)
    }

    // --- Grade criteria & certificates ---

    /// POST /admin/grade-criteria after local validation.
    pub async fn create_criteria(&self, criteria: &GradeCriteria) -> Result<GradeCriteria> {
        criteria.validate()?;
        let created: GradeCriteria = self.create(&GRADE_CRITERIA, criteria).await?;
        info!(id = %created.id, name = %created.name, "grade criteria created");
        Ok(created)
    }

    /// POST /admin/certificates/generate
    pub async fn generate_certificate(&self, req: &CertificateRequest) -> Result<Certificate> {
        req.validate()?;
        let cert: Certificate = self
            .send_json(Method::POST, CERTIFICATE_GENERATE_PATH, req)
            .await?
            .into_data()?;
        info!(student = %cert.student_id, grade = %cert.grade, "certificate issued");
        Ok(cert)
    }
}
