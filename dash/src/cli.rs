use std::path::PathBuf;

use campus::screen::{self, Screen};
use campus::types::GradeBand;
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

/// dash: admin console for the campus moderation backend.
#[derive(Parser, Debug)]
#[command(name = "dash", version)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    #[command(flatten)]
    pub conn: ConnArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Connection overrides; unset values fall back to the environment.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnArgs {
    /// Backend base URL (env CAMPUS_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// File holding the bearer token (env CAMPUS_TOKEN_FILE)
    #[arg(long, global = true)]
    pub token_file: Option<PathBuf>,

    /// Acting admin / mentor id (env CAMPUS_ADMIN_ID)
    #[arg(long, global = true)]
    pub admin_id: Option<String>,

    /// Rows per page (env CAMPUS_PAGE_SIZE)
    #[arg(long, global = true)]
    pub page_size: Option<u32>,

    /// Request timeout in seconds (env CAMPUS_TIMEOUT_SECS)
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print one page of a screen's records
    List(ListArgs),

    /// Print a screen's status counts
    Summary(ScreenArgs),

    /// Approve one record
    Approve(ApproveArgs),

    /// Reject one record
    Reject(RejectArgs),

    /// Approve several records at once
    BulkApprove(BulkApproveArgs),

    /// Reject several records at once
    BulkReject(BulkRejectArgs),

    /// Grade a task submission
    Grade(GradeArgs),

    /// Delete a record
    Delete(DeleteArgs),

    /// Replace fields of a record with a JSON body
    Update(UpdateArgs),

    /// Create an exam
    ExamCreate(ExamCreateArgs),

    /// Create a grade criteria set
    CriteriaCreate(CriteriaCreateArgs),

    /// Issue a certificate for a student
    Certificate(CertificateArgs),

    /// Launch the interactive moderation console
    Console(ScreenArgs),
}

/// Parse a screen name (exams, promotions, year-changes, submissions,
/// grade-criteria).
pub fn parse_screen(name: &str) -> Result<&'static Screen, String> {
    screen::by_name(name).ok_or_else(|| {
        let known: Vec<&str> = screen::ALL.iter().map(|s| s.name).collect();
        format!("unknown screen '{name}' (expected one of: {})", known.join(", "))
    })
}

#[derive(Args, Debug)]
pub struct ScreenArgs {
    /// Screen name
    #[arg(value_parser = parse_screen)]
    pub screen: &'static Screen,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Screen name
    #[arg(value_parser = parse_screen)]
    pub screen: &'static Screen,

    /// Page number (1-based)
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Status filter (pending, approved, rejected, graded, all)
    #[arg(long)]
    pub status: Option<String>,

    /// Free-text search
    #[arg(long)]
    pub search: Option<String>,

    /// Extra filter as key=value (e.g. batch=2024-A, days=7)
    #[arg(long = "filter", value_name = "KEY=VALUE")]
    pub filters: Vec<String>,

    /// Sort field
    #[arg(long)]
    pub sort_by: Option<String>,

    /// Sort order (asc, desc)
    #[arg(long)]
    pub sort_order: Option<String>,

    /// Output as JSON lines instead of TSV
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ApproveArgs {
    /// Screen name
    #[arg(value_parser = parse_screen)]
    pub screen: &'static Screen,

    /// Record id
    pub id: String,

    /// Message sent to the student
    #[arg(long)]
    pub note: Option<String>,
}

#[derive(Args, Debug)]
pub struct RejectArgs {
    /// Screen name
    #[arg(value_parser = parse_screen)]
    pub screen: &'static Screen,

    /// Record id
    pub id: String,

    /// Rejection reason (required, non-blank)
    #[arg(long, default_value = "")]
    pub reason: String,

    /// Longer explanation
    #[arg(long)]
    pub detail: Option<String>,
}

#[derive(Args, Debug)]
pub struct BulkApproveArgs {
    /// Screen name
    #[arg(value_parser = parse_screen)]
    pub screen: &'static Screen,

    /// Record ids
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// Response sent to every student
    #[arg(long)]
    pub note: Option<String>,
}

#[derive(Args, Debug)]
pub struct BulkRejectArgs {
    /// Screen name
    #[arg(value_parser = parse_screen)]
    pub screen: &'static Screen,

    /// Record ids
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// Rejection reason shared by all records
    #[arg(long, default_value = "")]
    pub reason: String,
}

#[derive(Args, Debug)]
pub struct GradeArgs {
    /// Submission id
    pub id: String,

    /// Awarded marks
    #[arg(long)]
    pub marks: Decimal,

    /// Maximum marks (defaults to the submission's own maximum, then 100)
    #[arg(long)]
    pub max_marks: Option<Decimal>,

    /// Feedback for the student
    #[arg(long)]
    pub feedback: Option<String>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Screen name
    #[arg(value_parser = parse_screen)]
    pub screen: &'static Screen,

    /// Record id
    pub id: String,
}

/// Parse a JSON object given on the command line.
pub fn parse_json_object(raw: &str) -> Result<serde_json::Value, String> {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value) if value.is_object() => Ok(value),
        Ok(_) => Err("body must be a JSON object".to_string()),
        Err(e) => Err(format!("invalid JSON: {e}")),
    }
}

/// Parse a grade band written as `GRADE:MIN-MAX`, e.g. `A:90-100`.
pub fn parse_band(raw: &str) -> Result<GradeBand, String> {
    let (grade, range) = raw
        .split_once(':')
        .ok_or_else(|| format!("band must be GRADE:MIN-MAX, got '{raw}'"))?;
    let (min, max) = range
        .split_once('-')
        .ok_or_else(|| format!("band range must be MIN-MAX, got '{range}'"))?;
    let percent = |v: &str| {
        v.trim()
            .parse::<Decimal>()
            .map_err(|_| format!("'{v}' is not a percentage"))
    };
    Ok(GradeBand {
        grade: grade.trim().to_string(),
        min_percent: percent(min)?,
        max_percent: percent(max)?,
    })
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Screen name
    #[arg(value_parser = parse_screen)]
    pub screen: &'static Screen,

    /// Record id
    pub id: String,

    /// Fields to update as a JSON object
    #[arg(long, value_parser = parse_json_object)]
    pub body: serde_json::Value,
}

#[derive(Args, Debug)]
pub struct CriteriaCreateArgs {
    #[arg(long)]
    pub name: String,

    /// Grade band as GRADE:MIN-MAX (repeatable)
    #[arg(long = "band", value_name = "GRADE:MIN-MAX", value_parser = parse_band, required = true)]
    pub bands: Vec<GradeBand>,
}

#[derive(Args, Debug)]
pub struct ExamCreateArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub subject: String,

    #[arg(long)]
    pub total_marks: u32,

    /// Duration in minutes
    #[arg(long)]
    pub duration: u32,

    /// RFC 3339 start time
    #[arg(long)]
    pub scheduled_at: Option<DateTime<Utc>>,
}

#[derive(Args, Debug)]
pub struct CertificateArgs {
    /// Student id
    #[arg(long)]
    pub student: String,

    /// Grade criteria id
    #[arg(long)]
    pub criteria: String,
}
