use url::Url;

use crate::host::hostname_matches;

/// Decides whether a processor runs for a given URL.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActivationRule {
    #[default]
    Always,
    /// Only for these hostnames and their subdomains.
    IncludesHostnames(Vec<String>),
    /// For everything except these hostnames and their subdomains.
    ExcludesHostnames(Vec<String>),
}

impl ActivationRule {
    pub fn includes<I, S>(hostnames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::IncludesHostnames(hostnames.into_iter().map(Into::into).collect())
    }

    pub fn excludes<I, S>(hostnames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::ExcludesHostnames(hostnames.into_iter().map(Into::into).collect())
    }

    pub fn applies_to(&self, url: &Url) -> bool {
        match self {
            Self::Always => true,
            Self::IncludesHostnames(hostnames) => url
                .host_str()
                .is_some_and(|host| hostnames.iter().any(|h| hostname_matches(host, h))),
            Self::ExcludesHostnames(hostnames) => !url
                .host_str()
                .is_some_and(|host| hostnames.iter().any(|h| hostname_matches(host, h))),
        }
    }
}
