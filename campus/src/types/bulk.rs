use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// `data` of a bulk approve / reject response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected: Option<Vec<String>>,
}

impl BulkReport {
    /// Ids the backend reports as processed, if it reports any list at all.
    pub fn reported(&self) -> Option<&[String]> {
        self.approved
            .as_deref()
            .or(self.rejected.as_deref())
    }
}

/// Per-id outcome of a bulk action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkActionResult {
    pub succeeded_ids: BTreeSet<String>,
    pub failed_ids: BTreeMap<String, String>,
}

impl BulkActionResult {
    /// Partial-failure reading: ids in `reported` succeeded, every other
    /// requested id failed. Without a report the batch is all-or-nothing and,
    /// having returned `success: true`, fully succeeded.
    pub fn from_report(requested: &[String], reported: Option<&[String]>) -> Self {
        match reported {
            None => Self::all_succeeded(requested),
            Some(done) => {
                let done: BTreeSet<&str> = done.iter().map(String::as_str).collect();
                let mut result = Self::default();
                for id in requested {
                    if done.contains(id.as_str()) {
                        result.succeeded_ids.insert(id.clone());
                    } else {
                        result
                            .failed_ids
                            .insert(id.clone(), "not processed by the server".to_string());
                    }
                }
                result
            }
        }
    }

    pub fn all_succeeded(requested: &[String]) -> Self {
        Self {
            succeeded_ids: requested.iter().cloned().collect(),
            failed_ids: BTreeMap::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failed_ids.is_empty()
    }
}
