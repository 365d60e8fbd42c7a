//! Client factory: environment plus command-line overrides.
//!
//! Wraps config loading into a single [`create_client`] call that produces a
//! ready [`CampusHttpClient`].

use std::path::PathBuf;
use std::time::Duration;

use campus::{AuthContext, CampusConfig, CampusHttpClient};
use tracing::{info, warn};

use crate::cli::ConnArgs;
use crate::error::DashError;

pub const ENV_API_URL: &str = "CAMPUS_API_URL";
pub const ENV_TOKEN: &str = "CAMPUS_TOKEN";
pub const ENV_TOKEN_FILE: &str = "CAMPUS_TOKEN_FILE";
pub const ENV_ADMIN_ID: &str = "CAMPUS_ADMIN_ID";
pub const ENV_PAGE_SIZE: &str = "CAMPUS_PAGE_SIZE";
pub const ENV_TIMEOUT_SECS: &str = "CAMPUS_TIMEOUT_SECS";

/// Resolved connection settings.
#[derive(Debug)]
pub struct Settings {
    pub config: CampusConfig,
    pub auth: AuthContext,
}

/// Resolve settings. Flags win over variables, variables over defaults.
///
/// `lookup` reads one variable; [`create_client`] passes `std::env::var`.
pub fn resolve_settings(
    args: &ConnArgs,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Settings, DashError> {
    let mut config = CampusConfig::default();

    if let Some(url) = args.api_url.clone().or_else(|| lookup(ENV_API_URL)) {
        config.api_url = url;
    }
    if let Some(size) = args.page_size {
        config.page_size = size;
    } else if let Some(raw) = lookup(ENV_PAGE_SIZE) {
        config.page_size = raw
            .trim()
            .parse()
            .map_err(|_| DashError::Config(format!("{ENV_PAGE_SIZE} is not a number: {raw}")))?;
    }
    let timeout = match args.timeout_secs {
        Some(secs) => Some(secs),
        None => match lookup(ENV_TIMEOUT_SECS) {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|_| {
                DashError::Config(format!("{ENV_TIMEOUT_SECS} is not a number: {raw}"))
            })?),
            None => None,
        },
    };
    if let Some(secs) = timeout {
        // 0 disables the timeout
        config.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
    }
    config.validate()?;

    let admin_id = args
        .admin_id
        .clone()
        .or_else(|| lookup(ENV_ADMIN_ID))
        .unwrap_or_default();

    let token_file = args
        .token_file
        .clone()
        .or_else(|| lookup(ENV_TOKEN_FILE).map(PathBuf::from));
    let auth = match token_file {
        Some(path) => AuthContext::from_token_file(&path, admin_id)?,
        None => AuthContext::new(lookup(ENV_TOKEN), admin_id),
    };

    Ok(Settings { config, auth })
}

/// Build the HTTP client from the process environment and `args`.
pub fn create_client(args: &ConnArgs) -> Result<(CampusHttpClient, CampusConfig), DashError> {
    let settings = resolve_settings(args, |key| std::env::var(key).ok())?;
    if !settings.auth.has_token() {
        warn!("no bearer token configured, requests will be sent unauthenticated");
    }
    if settings.auth.admin_id.is_empty() {
        warn!("{ENV_ADMIN_ID} is not set, moderation actions carry an empty admin id");
    }
    info!(api_url = %settings.config.api_url, "connecting");
    let client = CampusHttpClient::new(&settings.config, settings.auth)?;
    Ok((client, settings.config))
}
