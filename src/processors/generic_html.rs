use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::Selector;
use tracing::debug;
use url::Url;

use crate::config::FAVICON_PROBE_TIMEOUT;
use crate::dom::Document;
use crate::preview::{CANONICAL_URL, DESCRIPTION, FAVICON_URL, LinkPreview, TITLE};
use crate::processors::{MetadataProcessor, ProcessingContext};

static LINK_REL_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("link[rel]").unwrap());
static META_NAME_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("meta[name]").unwrap());
static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());

/// `rel` values accepted as a favicon.
const FAVICON_RELS: [&str; 4] = [
    "icon",
    "shortcut icon",
    "apple-touch-icon",
    "apple-touch-icon-precomposed",
];

/// Fallback extraction from plain HTML: `<title>`, `<meta name="description">`,
/// `<link rel="canonical">` and favicon links. Only fills fields that are
/// still empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericHtmlProcessor;

impl GenericHtmlProcessor {
    pub const ID: &'static str = "generic_html";
}

#[async_trait(?Send)]
impl MetadataProcessor for GenericHtmlProcessor {
    fn id(&self) -> &'static str {
        Self::ID
    }

    async fn update_preview(&self, preview: &mut LinkPreview, cx: &ProcessingContext<'_>) {
        let Some(document) = cx.document else {
            return;
        };

        if !preview.contains(CANONICAL_URL)
            && let Some(url) = find_canonical_url(document)
        {
            preview.fill(CANONICAL_URL, &url);
        }

        if !preview.contains(TITLE)
            && let Some(title) = find_title(document)
        {
            preview.fill(TITLE, &title);
        }

        if !preview.contains(DESCRIPTION)
            && let Some(description) = find_description(document)
        {
            preview.fill(DESCRIPTION, &description);
        }

        if !preview.contains(FAVICON_URL)
            && let Some(url) = find_favicon_url(document)
        {
            preview.fill(FAVICON_URL, &url);
        }

        if !preview.contains(FAVICON_URL)
            && cx.options.allow_additional_requests
            && let Some(url) = default_favicon_if_exists(cx.client, cx.url).await
        {
            preview.fill(FAVICON_URL, &url);
        }
    }
}

fn find_canonical_url(document: &Document) -> Option<Url> {
    document
        .select(&LINK_REL_SELECTOR)
        .find(|link| {
            link.attr("rel")
                .is_some_and(|rel| rel.trim().eq_ignore_ascii_case("canonical"))
        })?
        .abs_url("href")
}

fn find_title(document: &Document) -> Option<String> {
    let title = document.text(&TITLE_SELECTOR);
    (!title.is_empty()).then_some(title)
}

fn find_description(document: &Document) -> Option<String> {
    document
        .select(&META_NAME_SELECTOR)
        .find(|meta| {
            meta.attr("name")
                .is_some_and(|name| name.trim().eq_ignore_ascii_case("description"))
        })?
        .attr("content")
        .map(str::trim)
        .filter(|content| !content.is_empty())
        .map(str::to_string)
}

/// First favicon link in document order, whichever accepted `rel` it uses.
fn find_favicon_url(document: &Document) -> Option<Url> {
    document
        .select(&LINK_REL_SELECTOR)
        .filter(|link| {
            link.attr("rel").is_some_and(|rel| {
                let rel = rel.trim();
                FAVICON_RELS.iter().any(|accepted| rel.eq_ignore_ascii_case(accepted))
            })
        })
        .find_map(|link| link.abs_url("href"))
}

/// Probes `/favicon.ico` at the page origin. Any failure means "no favicon".
async fn default_favicon_if_exists(client: &Client, url: &Url) -> Option<Url> {
    url.host_str()?;
    let favicon = url.join("/favicon.ico").ok()?;

    match client
        .get(favicon.clone())
        .timeout(FAVICON_PROBE_TIMEOUT)
        .send()
        .await
    {
        Ok(response) if response.status().is_success() => Some(favicon),
        Ok(response) => {
            debug!(status = %response.status(), "no default favicon");
            None
        }
        Err(e) => {
            debug!(error = %e, "default favicon probe failed");
            None
        }
    }
}
