use async_trait::async_trait;
use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use reqwest::Client;
use scraper::Selector;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::SITE_API_TIMEOUT;
use crate::fetcher::read_body;
use crate::preview::{DESCRIPTION, LinkPreview, TITLE};
use crate::processors::{ActivationRule, MetadataProcessor, ProcessingContext};

static SHORT_DESCRIPTION_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.shortdescription").unwrap());

const WIKIPEDIA_HOST: &str = "wikipedia.org";
const MAX_API_BODY: u64 = 1024 * 1024; // 1MB

/// Fills in a missing Wikipedia description, first from the page's short
/// description and otherwise from the article intro served by the
/// MediaWiki API.
#[derive(Debug, Clone, Default)]
pub struct WikipediaProcessor {
    api_endpoint: Option<Url>,
}

impl WikipediaProcessor {
    pub const ID: &'static str = "wikipedia";

    pub fn new() -> Self {
        Self::default()
    }

    /// Sends API queries to `endpoint` instead of `https://<page host>/w/api.php`.
    pub fn with_api_endpoint(endpoint: Url) -> Self {
        Self {
            api_endpoint: Some(endpoint),
        }
    }

    fn api_url(&self, page: &Url) -> Option<Url> {
        let mut api = match &self.api_endpoint {
            Some(endpoint) => endpoint.clone(),
            None => Url::parse(&format!("https://{}/w/api.php", page.host_str()?)).ok()?,
        };
        let title = page_title(page)?;
        api.query_pairs_mut()
            .clear()
            .append_pair("action", "query")
            .append_pair("titles", &title)
            .append_key_only("exintro")
            .append_pair("format", "json")
            .append_pair("prop", "extracts")
            .append_key_only("explaintext");
        Some(api)
    }
}

#[async_trait(?Send)]
impl MetadataProcessor for WikipediaProcessor {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn activation_rule(&self) -> ActivationRule {
        ActivationRule::includes([WIKIPEDIA_HOST])
    }

    async fn update_preview(&self, preview: &mut LinkPreview, cx: &ProcessingContext<'_>) {
        let Some(document) = cx.document else {
            return;
        };

        if preview.contains(DESCRIPTION) {
            return;
        }

        let short_description = document.text(&SHORT_DESCRIPTION_SELECTOR);
        if !short_description.is_empty() {
            preview.fill(DESCRIPTION, &short_description);
            return;
        }

        if !cx.options.allow_additional_requests {
            return;
        }

        let Some(api_url) = self.api_url(cx.url) else {
            return;
        };
        let Some(page) = fetch_intro(cx.client, api_url).await else {
            return;
        };

        if let Some(title) = page.get("title").and_then(Value::as_str) {
            preview.fill(TITLE, &title.to_string());
        }
        if let Some(extract) = page.get("extract").and_then(Value::as_str) {
            preview.fill(DESCRIPTION, &extract.to_string());
        }
    }
}

/// Decoded last path segment, e.g. `Italian_language`.
fn page_title(page: &Url) -> Option<String> {
    let segment = page.path_segments()?.rev().find(|s| !s.is_empty())?;
    let title = percent_decode_str(segment).decode_utf8_lossy().into_owned();
    Some(title)
}

/// Returns `query.pages.<first>` from the API response, or `None` on any
/// transport or shape problem.
async fn fetch_intro(client: &Client, api_url: Url) -> Option<Value> {
    let response = match client.get(api_url).timeout(SITE_API_TIMEOUT).send().await {
        Ok(response) => response,
        Err(e) => {
            debug!(error = %e, "wikipedia api request failed");
            return None;
        }
    };

    if !response.status().is_success() {
        debug!(status = %response.status(), "wikipedia api returned an error");
        return None;
    }

    let body = match read_body(response, MAX_API_BODY).await {
        Ok(body) => body,
        Err(e) => {
            debug!(error = %e, "wikipedia api body unreadable");
            return None;
        }
    };

    let json: Value = match serde_json::from_slice(&body) {
        Ok(json) => json,
        Err(e) => {
            debug!(error = %e, "wikipedia api returned malformed json");
            return None;
        }
    };

    json.get("query")?
        .get("pages")?
        .as_object()?
        .values()
        .next()
        .filter(|page| page.is_object())
        .cloned()
}
