use serde::{Deserialize, Serialize};

use crate::error::{CampusError, Result};

/// `{ success, message?, data? }` wrapper used by every backend response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Unwrap the envelope, turning `success: false` into
    /// `CampusError::Application` with the backend's message.
    pub fn into_result(self) -> Result<(Option<T>, Option<String>)> {
        if !self.success {
            let message = self
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "The server rejected the request".to_string());
            return Err(CampusError::Application(message));
        }
        Ok((self.data, self.message))
    }

    /// Like [`Envelope::into_result`] but requires `data`.
    pub fn into_data(self) -> Result<T> {
        match self.into_result()? {
            (Some(data), _) => Ok(data),
            (None, _) => Err(CampusError::Application(
                "response did not include data".to_string(),
            )),
        }
    }
}
