use std::io::Write;

use campus::types::{
    Certificate, DashboardSummary, Exam, GradeCriteria, Page, PromotionRequest, Submission,
    YearChangeRequest,
};
use campus::{Notice, NoticeLevel};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::DashError;

/// Column layout of a record in TSV output and the console table.
pub trait Tabular {
    fn columns() -> &'static [&'static str];
    fn cells(&self) -> Vec<String>;
}

fn opt<T: ToString>(v: &Option<T>) -> String {
    v.as_ref().map(ToString::to_string).unwrap_or_default()
}

fn date(v: &Option<DateTime<Utc>>) -> String {
    v.as_ref()
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

impl Tabular for Exam {
    fn columns() -> &'static [&'static str] {
        &["id", "title", "subject", "marks", "minutes", "scheduled", "published"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.title.clone(),
            self.subject.clone(),
            self.total_marks.to_string(),
            self.duration_minutes.to_string(),
            date(&self.scheduled_at),
            if self.is_published { "yes" } else { "no" }.to_string(),
        ]
    }
}

impl Tabular for PromotionRequest {
    fn columns() -> &'static [&'static str] {
        &["id", "student", "email", "batch", "year", "status", "created"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.student_name.clone(),
            self.email.clone(),
            opt(&self.batch),
            opt(&self.current_year),
            self.status.to_string(),
            date(&self.created_at),
        ]
    }
}

impl Tabular for YearChangeRequest {
    fn columns() -> &'static [&'static str] {
        &["id", "student", "from", "to", "reason", "status", "created"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.student_name.clone(),
            self.current_year.to_string(),
            self.requested_year.to_string(),
            opt(&self.reason),
            self.status.to_string(),
            date(&self.created_at),
        ]
    }
}

impl Tabular for Submission {
    fn columns() -> &'static [&'static str] {
        &["id", "student", "task", "status", "marks", "submitted"]
    }

    fn cells(&self) -> Vec<String> {
        let marks = match (self.marks, self.max_marks) {
            (Some(m), Some(max)) => format!("{m}/{max}"),
            (Some(m), None) => m.to_string(),
            _ => String::new(),
        };
        vec![
            self.id.clone(),
            self.student_name.clone(),
            self.task_title.clone(),
            self.status.to_string(),
            marks,
            date(&self.submitted_at),
        ]
    }
}

impl Tabular for GradeCriteria {
    fn columns() -> &'static [&'static str] {
        &["id", "name", "bands"]
    }

    fn cells(&self) -> Vec<String> {
        let bands: Vec<String> = self
            .bands
            .iter()
            .map(|b| format!("{}:{}-{}", b.grade, b.min_percent, b.max_percent))
            .collect();
        vec![self.id.clone(), self.name.clone(), bands.join(" ")]
    }
}

impl Tabular for Certificate {
    fn columns() -> &'static [&'static str] {
        &["id", "student", "grade", "percent", "issued", "url"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.student_name.clone().unwrap_or_else(|| self.student_id.clone()),
            self.grade.clone(),
            opt(&self.percentage),
            date(&self.issued_at),
            opt(&self.download_url),
        ]
    }
}

/// Tabs and newlines inside a cell would break the TSV layout.
fn clean(cell: &str) -> String {
    cell.replace(['\t', '\n', '\r'], " ")
}

fn write_tsv_row<W: Write>(writer: &mut W, cells: &[String]) -> Result<(), DashError> {
    let line: Vec<String> = cells.iter().map(|c| clean(c)).collect();
    writeln!(writer, "{}", line.join("\t"))?;
    Ok(())
}

/// Write one record as TSV (without header) or one JSON line.
pub fn write_record<T, W>(record: &T, json_mode: bool, writer: &mut W) -> Result<(), DashError>
where
    T: Tabular + Serialize,
    W: Write,
{
    if json_mode {
        serde_json::to_writer(&mut *writer, record)?;
        writeln!(writer)?;
    } else {
        write_tsv_row(writer, &record.cells())?;
    }
    Ok(())
}

/// Write a page: header row, records and a `# page` footer for TSV, one JSON
/// object per line otherwise.
pub fn write_page<T, W>(page: &Page<T>, json_mode: bool, writer: &mut W) -> Result<(), DashError>
where
    T: Tabular + Serialize,
    W: Write,
{
    if !json_mode {
        let header: Vec<String> = T::columns().iter().map(|c| c.to_string()).collect();
        write_tsv_row(writer, &header)?;
    }
    for item in &page.items {
        write_record(item, json_mode, writer)?;
    }
    if !json_mode {
        writeln!(
            writer,
            "# page {}/{} ({} total)",
            page.current_page,
            page.total_pages.max(1),
            page.total_count
        )?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_summary<W: Write>(
    summary: &DashboardSummary,
    json_mode: bool,
    writer: &mut W,
) -> Result<(), DashError> {
    if json_mode {
        serde_json::to_writer(&mut *writer, summary)?;
        writeln!(writer)?;
    } else {
        writeln!(writer, "pending\tapproved\trejected\ttotal")?;
        writeln!(
            writer,
            "{}\t{}\t{}\t{}",
            summary.pending, summary.approved, summary.rejected, summary.total
        )?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_notice<W: Write>(notice: &Notice, writer: &mut W) -> Result<(), DashError> {
    let tag = match notice.level {
        NoticeLevel::Info => "info",
        NoticeLevel::Success => "ok",
        NoticeLevel::Warning => "warning",
        NoticeLevel::Error => "error",
    };
    writeln!(writer, "{tag}: {}", notice.text)?;
    if notice.requires_login {
        writeln!(writer, "hint: set CAMPUS_TOKEN or --token-file with a fresh token")?;
    }
    Ok(())
}
