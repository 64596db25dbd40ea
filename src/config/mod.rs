//! Options that control how a preview is extracted.
//!
//! `ProcessingOptions::default()` mirrors what the CLI uses out of the box.
//! `ProcessingOptions::from_env` layers environment overrides on top of those
//! defaults so deployments can tune timeouts and User-Agent overrides
//! without recompiling.

use std::env;
use std::time::Duration;

use thiserror::Error;

use crate::fetcher::user_agent::SiteUserAgent;

/// Environment variable names. Public so tests and embedding binaries can
/// refer to them.
pub const ENV_ALLOW_ADDITIONAL_REQUESTS: &str = "UNFURL_ALLOW_ADDITIONAL_REQUESTS";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "UNFURL_REQUEST_TIMEOUT_SECS";
pub const ENV_USER_AGENTS: &str = "UNFURL_USER_AGENTS";
pub const ENV_ACCEPT_LANGUAGE: &str = "UNFURL_ACCEPT_LANGUAGE";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_ACCEPT_LANGUAGE: &str = "en";

/// Timeout for the `/favicon.ico` probe.
pub const FAVICON_PROBE_TIMEOUT: Duration = Duration::from_secs(1);
/// Timeout for site API calls such as the Wikipedia extract lookup.
pub const SITE_API_TIMEOUT: Duration = Duration::from_secs(5);

/// Runtime options shared by the fetcher and every metadata processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingOptions {
    /// Whether processors may issue requests beyond the primary fetch.
    pub allow_additional_requests: bool,
    /// Timeout for the primary page fetch.
    pub request_timeout: Duration,
    /// Per-hostname User-Agent overrides for the primary fetch.
    pub site_user_agents: Vec<SiteUserAgent>,
    /// Value sent as `Accept-Language` unless the caller supplies one.
    pub accept_language: Option<String>,
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self {
            allow_additional_requests: true,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            site_user_agents: vec![SiteUserAgent::new("spotify.com", "Twitterbot/1.0")],
            accept_language: Some(DEFAULT_ACCEPT_LANGUAGE.to_string()),
        }
    }
}

impl ProcessingOptions {
    /// Load from environment variables, falling back to the defaults for
    /// anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut options = Self::default();

        if let Ok(raw) = env::var(ENV_ALLOW_ADDITIONAL_REQUESTS) {
            options.allow_additional_requests = parse_bool(ENV_ALLOW_ADDITIONAL_REQUESTS, &raw)?;
        }

        if let Ok(raw) = env::var(ENV_REQUEST_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                field: ENV_REQUEST_TIMEOUT_SECS,
                reason: format!("expected a whole number of seconds, got {raw:?}"),
            })?;
            options.request_timeout = Duration::from_secs(secs);
        }

        if let Ok(raw) = env::var(ENV_USER_AGENTS) {
            options.site_user_agents = parse_user_agents(&raw)?;
        }

        if let Ok(raw) = env::var(ENV_ACCEPT_LANGUAGE) {
            let raw = raw.trim();
            options.accept_language = (!raw.is_empty()).then(|| raw.to_string());
        }

        Ok(options)
    }
}

fn parse_bool(field: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            field,
            reason: format!("expected a boolean, got {other:?}"),
        }),
    }
}

/// Parses `host=agent;host=agent`. Empty entries are ignored.
fn parse_user_agents(raw: &str) -> Result<Vec<SiteUserAgent>, ConfigError> {
    raw.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (hostname, agent) = entry
                .split_once('=')
                .map(|(h, a)| (h.trim(), a.trim()))
                .filter(|(h, a)| !h.is_empty() && !a.is_empty())
                .ok_or_else(|| ConfigError::InvalidValue {
                    field: ENV_USER_AGENTS,
                    reason: format!("expected host=agent, got {entry:?}"),
                })?;
            Ok(SiteUserAgent::new(hostname, agent))
        })
        .collect()
}

/// Errors that can occur while building options from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
