pub mod endpoints;

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::auth::AuthContext;
use crate::config::CampusConfig;
use crate::error::{CampusError, Result};
use crate::types::Envelope;

/// HTTP client wrapper for the campus REST API.
///
/// Attaches the bearer token from the [`AuthContext`] to every request and
/// decodes the `{ success, message, data }` envelope.
#[derive(Debug, Clone)]
pub struct CampusHttpClient {
    client: Client,
    base_url: String,
    auth: AuthContext,
}

impl CampusHttpClient {
    pub fn new(config: &CampusConfig, auth: AuthContext) -> Result<Self> {
        config.validate()?;
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let req = self.client.request(method, url);
        match self.auth.token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<Envelope<T>> {
        let resp = req.send().await.map_err(CampusError::from_reqwest)?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = envelope_message(&body).unwrap_or(body);
            warn!(status = status.as_u16(), %message, "request failed");
            return Err(CampusError::from_status(status.as_u16(), message));
        }

        let bytes = resp.bytes().await.map_err(CampusError::from_reqwest)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// GET a resource with query parameters.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Envelope<T>> {
        debug!(path, ?query, "GET");
        self.send(self.request(Method::GET, path).query(query)).await
    }

    /// Send a JSON body with the given method.
    pub async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Envelope<T>> {
        debug!(%method, path, "send");
        self.send(self.request(method, path).json(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<Envelope<T>> {
        debug!(path, "DELETE");
        self.send(self.request(Method::DELETE, path)).await
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Pull `message` out of an error body shaped like the envelope.
fn envelope_message(body: &str) -> Option<String> {
    let env: Envelope<serde_json::Value> = serde_json::from_str(body).ok()?;
    env.message.filter(|m| !m.trim().is_empty())
}
