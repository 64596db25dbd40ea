use url::Url;

use crate::host::hostname_matches;

/// Sent when neither the caller nor the site table supplies a User-Agent.
/// Many sites only serve OpenGraph tags to known link-unfurling crawlers.
pub const DEFAULT_USER_AGENT: &str = "facebookexternalhit/1.1 Facebot Twitterbot/1.0";

/// A User-Agent override for one site (and its subdomains).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteUserAgent {
    pub hostname: String,
    pub user_agent: String,
}

impl SiteUserAgent {
    pub fn new(hostname: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            user_agent: user_agent.into(),
        }
    }
}

/// Picks the override whose hostname matches `url` most specifically.
pub fn best_match<'a>(table: &'a [SiteUserAgent], url: &Url) -> Option<&'a str> {
    let host = url.host_str()?;
    table
        .iter()
        .filter(|entry| hostname_matches(host, &entry.hostname))
        .max_by_key(|entry| entry.hostname.len())
        .map(|entry| entry.user_agent.as_str())
}
