use campus::CampusError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashError {
    #[error(transparent)]
    Campus(#[from] CampusError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("terminal error: {0}")]
    Terminal(String),
}

impl DashError {
    /// Process exit code: 2 for bad input, 3 for auth, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            DashError::Campus(e) if e.is_auth() => 3,
            DashError::Campus(e) if e.class() == campus::ErrorClass::Validation => 2,
            DashError::Config(_) => 2,
            _ => 1,
        }
    }
}
