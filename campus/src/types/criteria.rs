use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CampusError, Result};
use crate::types::subject::ModerationSubject;

/// One grade band, inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeBand {
    pub grade: String,
    pub min_percent: Decimal,
    pub max_percent: Decimal,
}

impl GradeBand {
    pub fn contains(&self, percent: Decimal) -> bool {
        percent >= self.min_percent && percent <= self.max_percent
    }
}

/// Named set of grade bands used when issuing certificates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeCriteria {
    #[serde(alias = "_id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    pub bands: Vec<GradeBand>,
}

impl ModerationSubject for GradeCriteria {
    fn id(&self) -> &str {
        &self.id
    }
}

impl GradeCriteria {
    /// Bands must be non-empty, lie within [0, 100], have min <= max and
    /// not overlap.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CampusError::Validation("Criteria name is required".into()));
        }
        if self.bands.is_empty() {
            return Err(CampusError::Validation(
                "At least one grade band is required".into(),
            ));
        }
        let hundred = Decimal::ONE_HUNDRED;
        for band in &self.bands {
            if band.grade.trim().is_empty() {
                return Err(CampusError::Validation("Grade label is required".into()));
            }
            if band.min_percent < Decimal::ZERO
                || band.max_percent > hundred
                || band.min_percent > band.max_percent
            {
                return Err(CampusError::Validation(format!(
                    "Band {} has an invalid range {}..{}",
                    band.grade, band.min_percent, band.max_percent
                )));
            }
        }
        let mut sorted: Vec<&GradeBand> = self.bands.iter().collect();
        sorted.sort_by(|a, b| a.min_percent.cmp(&b.min_percent));
        for pair in sorted.windows(2) {
            if pair[1].min_percent <= pair[0].max_percent {
                return Err(CampusError::Validation(format!(
                    "Bands {} and {} overlap",
                    pair[0].grade, pair[1].grade
                )));
            }
        }
        Ok(())
    }

    pub fn grade_for(&self, percent: Decimal) -> Option<&GradeBand> {
        self.bands.iter().find(|b| b.contains(percent))
    }
}

/// `marks / max_marks * 100`, rounded to two places.
pub fn percentage(marks: Decimal, max_marks: Decimal) -> Option<Decimal> {
    if max_marks <= Decimal::ZERO {
        return None;
    }
    Some((marks / max_marks * Decimal::ONE_HUNDRED).round_dp(2))
}
