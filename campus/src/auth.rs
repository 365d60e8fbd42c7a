//! Authentication context passed explicitly to every client.
//!
//! The token is read once from persisted storage (environment or a token
//! file) and never validated locally; requests without it simply fail on the
//! server with 401.

use std::path::Path;

use tracing::debug;

use crate::error::{CampusError, Result};

#[derive(Clone, Default)]
pub struct AuthContext {
    token: Option<String>,
    /// Identifier of the acting admin or mentor, sent in mutation bodies.
    pub admin_id: String,
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("admin_id", &self.admin_id)
            .finish()
    }
}

impl AuthContext {
    pub fn new(token: Option<String>, admin_id: impl Into<String>) -> Self {
        let token = token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        Self {
            token,
            admin_id: admin_id.into(),
        }
    }

    /// Load the token from a file, as written by the login flow.
    pub fn from_token_file(path: &Path, admin_id: impl Into<String>) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CampusError::Config(format!("cannot read token file {}: {e}", path.display()))
        })?;
        debug!(path = %path.display(), "loaded token file");
        Ok(Self::new(Some(raw), admin_id))
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }
}
