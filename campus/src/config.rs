use std::time::Duration;

use url::Url;

use crate::error::{CampusError, Result};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default rows per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Configuration for the campus client.
#[derive(Debug, Clone)]
pub struct CampusConfig {
    /// Base URL of the REST backend (e.g. `https://api.example.edu/api`).
    pub api_url: String,
    /// Per-request timeout. `None` disables it.
    pub request_timeout: Option<Duration>,
    /// Rows per page for list screens.
    pub page_size: u32,
}

impl Default for CampusConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000/api".into(),
            request_timeout: Some(DEFAULT_TIMEOUT),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl CampusConfig {
    /// Check the base URL parses and uses http(s), and the page size is usable.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.api_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(CampusError::Config(format!(
                "unsupported scheme '{}' in {}",
                url.scheme(),
                self.api_url
            )));
        }
        if self.page_size == 0 {
            return Err(CampusError::Config("page size must be positive".into()));
        }
        Ok(())
    }
}
