use thiserror::Error;

/// Coarse error classes the UI reacts to differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Local input problem; nothing was sent.
    Validation,
    /// Network failure, timeout, non-2xx status or undecodable body.
    Transport,
    /// The backend answered `success: false`.
    Application,
    /// 401 / 403. The session must be renewed by the user.
    Auth,
}

#[derive(Error, Debug)]
pub enum CampusError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("request already in flight for {0}")]
    InFlight(String),

    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    #[error("authentication failed ({status}): {message}")]
    Auth { status: u16, message: String },

    #[error("request timed out")]
    Timeout,

    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("{0}")]
    Application(String),

    #[error("config error: {0}")]
    Config(String),
}

impl CampusError {
    pub fn class(&self) -> ErrorClass {
        match self {
            CampusError::Validation(_) | CampusError::InFlight(_) | CampusError::Config(_) => {
                ErrorClass::Validation
            }
            CampusError::Auth { .. } => ErrorClass::Auth,
            CampusError::Application(_) => ErrorClass::Application,
            CampusError::Http { .. }
            | CampusError::Timeout
            | CampusError::Request(_)
            | CampusError::Json(_)
            | CampusError::Url(_) => ErrorClass::Transport,
        }
    }

    pub fn is_auth(&self) -> bool {
        self.class() == ErrorClass::Auth
    }

    /// Map a non-2xx status and its body to the matching error.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => CampusError::Auth {
                status,
                message: body,
            },
            _ => CampusError::Http {
                status,
                message: body,
            },
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CampusError::Timeout
        } else {
            CampusError::Request(err)
        }
    }
}

pub type Result<T> = std::result::Result<T, CampusError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(CampusError::from_status(401, String::new()).is_auth());
        assert!(CampusError::from_status(403, String::new()).is_auth());
        assert_eq!(
            CampusError::from_status(500, "boom".into()).class(),
            ErrorClass::Transport
        );
        assert_eq!(
            CampusError::from_status(404, String::new()).class(),
            ErrorClass::Transport
        );
    }

    #[test]
    fn test_local_errors_are_validation() {
        assert_eq!(
            CampusError::Validation("x".into()).class(),
            ErrorClass::Validation
        );
        assert_eq!(
            CampusError::InFlight("abc".into()).class(),
            ErrorClass::Validation
        );
        assert_eq!(
            CampusError::Application("nope".into()).class(),
            ErrorClass::Application
        );
    }
}
