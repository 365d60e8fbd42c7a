//! User-facing notifications.
//!
//! Every error is caught at the action boundary and turned into a [`Notice`];
//! nothing propagates past the controller.

use crate::error::{CampusError, ErrorClass};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
    /// Set for auth failures so the UI can offer a re-login hint.
    pub requires_login: bool,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
            requires_login: false,
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
            requires_login: false,
        }
    }

    pub fn from_error(err: &CampusError) -> Self {
        match err.class() {
            ErrorClass::Validation => Self {
                level: NoticeLevel::Warning,
                text: match err {
                    CampusError::Validation(msg) => msg.clone(),
                    CampusError::InFlight(_) => "Action already in progress".to_string(),
                    other => other.to_string(),
                },
                requires_login: false,
            },
            ErrorClass::Auth => Self {
                level: NoticeLevel::Error,
                text: "Session expired or not authorized, please log in again".to_string(),
                requires_login: true,
            },
            ErrorClass::Application => Self {
                level: NoticeLevel::Error,
                // backend text verbatim
                text: match err {
                    CampusError::Application(msg) => msg.clone(),
                    other => other.to_string(),
                },
                requires_login: false,
            },
            ErrorClass::Transport => Self {
                level: NoticeLevel::Error,
                text: match err {
                    CampusError::Timeout => "Request timed out, try again".to_string(),
                    CampusError::Http { status, .. } => {
                        format!("Server returned {status}, try again")
                    }
                    _ => "Network error, try again".to_string(),
                },
                requires_login: false,
            },
        }
    }
}
