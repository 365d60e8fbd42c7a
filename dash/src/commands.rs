//! One-shot subcommands.
//!
//! Mutations run through the same [`ModerationController`] validation and
//! in-flight guard as the console; only the rendering differs.

use std::io::{self, Write};

use campus::controller::{ActionRequest, ModerationApi, Target};
use campus::screen::{Screen, SUBMISSIONS};
use campus::types::{
    CertificateRequest, Exam, GradeCriteria, ListQuery, ModerationSubject, NewExam, Submission,
};
use campus::{CampusHttpClient, ModerationController, Notice, ScreenClient, SortOrder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::cli::{CriteriaCreateArgs, ExamCreateArgs, GradeArgs, ListArgs};
use crate::error::DashError;
use crate::output::{self, Tabular};

/// Everything a screen's record type needs for the CLI and the console.
pub trait Record:
    ModerationSubject + Tabular + Serialize + DeserializeOwned + Send + Sync + 'static
{
}

impl<T> Record for T where
    T: ModerationSubject + Tabular + Serialize + DeserializeOwned + Send + Sync + 'static
{
}

/// Call a generic function with the record type that belongs to `screen`.
macro_rules! with_record {
    ($screen:expr, $func:ident($($arg:expr),* $(,)?)) => {
        match $screen.name {
            "exams" => $func::<campus::types::Exam>($($arg),*).await,
            "promotions" => $func::<campus::types::PromotionRequest>($($arg),*).await,
            "year-changes" => $func::<campus::types::YearChangeRequest>($($arg),*).await,
            "submissions" => $func::<campus::types::Submission>($($arg),*).await,
            "grade-criteria" => $func::<campus::types::GradeCriteria>($($arg),*).await,
            other => Err($crate::error::DashError::Config(format!(
                "no record type for screen {other}"
            ))),
        }
    };
}
pub(crate) use with_record;

/// Split a `key=value` filter argument.
pub fn parse_filter(raw: &str) -> Result<(String, String), DashError> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| DashError::Config(format!("filter must be KEY=VALUE, got '{raw}'")))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(DashError::Config(format!("empty filter key in '{raw}'")));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

/// Build the list query from command-line arguments on top of the screen
/// defaults.
pub fn build_query(args: &ListArgs, page_size: u32) -> Result<ListQuery, DashError> {
    let screen = args.screen;
    let mut query = ListQuery::new(args.page, page_size)?;
    if let Some(status) = screen.default_status {
        query = query.with_filter("status", status.as_str());
    }
    if let Some((field, order)) = screen.default_sort {
        query = query.with_sort(field, order);
    }
    if let Some(status) = &args.status {
        query = query.with_filter("status", status.as_str());
    }
    if let Some(search) = &args.search {
        query = query.with_filter("search", search.as_str());
    }
    for raw in &args.filters {
        let (key, value) = parse_filter(raw)?;
        if !screen.knows_filter(&key) {
            debug!(screen = screen.name, key, "filter not declared by screen, sending anyway");
        }
        query = query.with_filter(key, value);
    }
    if args.sort_by.is_some() || args.sort_order.is_some() {
        let field = args
            .sort_by
            .clone()
            .or_else(|| query.sort_by().map(str::to_string))
            .unwrap_or_else(|| "createdAt".to_string());
        let order = match &args.sort_order {
            Some(raw) => raw.parse::<SortOrder>()?,
            None => query.sort_order(),
        };
        query = query.with_sort(field, order);
    }
    Ok(query)
}

pub async fn list<T: Record>(
    http: &CampusHttpClient,
    args: &ListArgs,
    page_size: u32,
) -> Result<(), DashError> {
    let query = build_query(args, page_size)?;
    let page = http.list::<T>(args.screen, &query).await?;
    info!(
        screen = args.screen.name,
        rows = page.items.len(),
        total = page.total_count,
        "listed"
    );
    output::write_page(&page, args.json, &mut io::stdout().lock())
}

pub async fn summary(http: &CampusHttpClient, screen: &Screen) -> Result<(), DashError> {
    let summary = http.summary(screen).await?;
    output::write_summary(&summary, false, &mut io::stdout().lock())
}

/// Validate, send and report one moderation action.
pub async fn act<T: Record>(
    http: &CampusHttpClient,
    screen: &'static Screen,
    target: Target,
    request: ActionRequest,
) -> Result<(), DashError> {
    let api = ScreenClient::<T>::new(http.clone(), screen);
    let mut controller = ModerationController::<T>::new(screen, 1)?;

    let action = controller.prepare_action(target, request)?;
    let result = api.perform(&action).await;
    let outcome = controller.settle_action(&action, result);

    let mut stdout = io::stdout().lock();
    if let Some(notice) = controller.notice() {
        output::write_notice(notice, &mut stdout)?;
    }
    outcome?;
    stdout.flush()?;
    Ok(())
}

/// Grade one submission. Without `--max-marks` the bound is read from the
/// submission first.
pub async fn grade(http: &CampusHttpClient, args: &GradeArgs) -> Result<(), DashError> {
    let max_marks = match args.max_marks {
        Some(max) => Some(max),
        None => {
            let submission: Submission = http.fetch_item(&SUBMISSIONS, &args.id).await?;
            debug!(id = %args.id, max_marks = ?submission.max_marks, "loaded submission");
            submission.max_marks
        }
    };
    let request = ActionRequest::Grade {
        marks: args.marks,
        max_marks,
        feedback: args.feedback.clone(),
    };
    act::<Submission>(http, &SUBMISSIONS, Target::One(args.id.clone()), request).await
}

pub async fn create_exam(http: &CampusHttpClient, args: &ExamCreateArgs) -> Result<(), DashError> {
    let exam = NewExam {
        title: args.title.trim().to_string(),
        subject: args.subject.trim().to_string(),
        total_marks: args.total_marks,
        duration_minutes: args.duration,
        scheduled_at: args.scheduled_at,
    };
    let created: Exam = http.create_exam(&exam).await?;
    let mut stdout = io::stdout().lock();
    output::write_notice(&Notice::success(format!("Created exam {}", created.id)), &mut stdout)?;
    output::write_record(&created, false, &mut stdout)?;
    Ok(())
}

pub async fn create_criteria(
    http: &CampusHttpClient,
    args: &CriteriaCreateArgs,
) -> Result<(), DashError> {
    let criteria = GradeCriteria {
        id: String::new(),
        name: args.name.trim().to_string(),
        bands: args.bands.clone(),
    };
    let created = http.create_criteria(&criteria).await?;
    let mut stdout = io::stdout().lock();
    output::write_notice(
        &Notice::success(format!("Created grade criteria {}", created.id)),
        &mut stdout,
    )?;
    output::write_record(&created, false, &mut stdout)?;
    Ok(())
}

pub async fn certificate(
    http: &CampusHttpClient,
    student: &str,
    criteria: &str,
) -> Result<(), DashError> {
    let req = CertificateRequest {
        student_id: student.trim().to_string(),
        criteria_id: criteria.trim().to_string(),
    };
    let cert = http.generate_certificate(&req).await?;
    output::write_record(&cert, false, &mut io::stdout().lock())
}
