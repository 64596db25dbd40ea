use reqwest::{
    Client, ClientBuilder, Response,
    header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT},
};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::config::ProcessingOptions;
use crate::fetcher::{
    errors::FetchError,
    pipeline::decode_body,
    types::{FetchOutput, HtmlPage},
    user_agent::{DEFAULT_USER_AGENT, best_match},
};

const MAX_BODY_SIZE: u64 = 10 * 1024 * 1024; // 10MB
const MAX_REDIRECTS: usize = 10;

/// Builds the client shared by the primary fetch and processor sub-requests.
///
/// No default User-Agent is configured here: it is chosen per request so the
/// site table and caller headers can take effect.
pub fn build_client() -> Result<Client, FetchError> {
    ClientBuilder::new()
        .connect_timeout(Duration::from_secs(10))
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .default_headers({
            let mut headers = HeaderMap::new();
            headers.insert(
                ACCEPT,
                HeaderValue::from_static(
                    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
                ),
            );
            headers
        })
        .build()
        .map_err(|e| FetchError::Client(e.to_string()))
}

/// Fills in User-Agent and Accept-Language unless the caller already set them.
pub fn prepare_headers(mut headers: HeaderMap, url: &Url, options: &ProcessingOptions) -> HeaderMap {
    if !headers.contains_key(USER_AGENT) {
        let agent = best_match(&options.site_user_agents, url).unwrap_or(DEFAULT_USER_AGENT);
        if let Ok(value) = HeaderValue::from_str(agent) {
            headers.insert(USER_AGENT, value);
        }
    }

    if !headers.contains_key(ACCEPT_LANGUAGE)
        && let Some(language) = options.accept_language.as_deref()
        && let Ok(value) = HeaderValue::from_str(language)
    {
        headers.insert(ACCEPT_LANGUAGE, value);
    }

    headers
}

#[instrument(skip_all, fields(url = %url))]
pub async fn fetch(
    client: &Client,
    url: &Url,
    headers: HeaderMap,
    options: &ProcessingOptions,
) -> Result<FetchOutput, FetchError> {
    let response = client
        .get(url.clone())
        .headers(prepare_headers(headers, url, options))
        .timeout(options.request_timeout)
        .send()
        .await
        .map_err(FetchError::from_reqwest_error)?;

    let final_url = response.url().clone();
    let status = response.status();
    let headers = response.headers().clone();

    if !status.is_success() {
        return Err(FetchError::Http { status, headers });
    }

    let Some(raw_content_type) = headers.get(CONTENT_TYPE) else {
        return Err(FetchError::UnsupportedContentType(String::new()));
    };
    let content_type = raw_content_type
        .to_str()
        .map_err(|_| {
            let lossy = String::from_utf8_lossy(raw_content_type.as_bytes());
            FetchError::UnsupportedContentType(lossy.into_owned())
        })?
        .to_string();

    if !content_type.to_ascii_lowercase().contains("text/html") {
        debug!(%content_type, "non-html resource");
        return Ok(FetchOutput::Resource {
            url: final_url,
            content_type,
        });
    }

    let body_bytes = read_body(response, MAX_BODY_SIZE).await?;

    let (body_utf8, encoding) = decode_body(&content_type, &body_bytes);
    debug!(%status, charset = encoding.name(), size = body_bytes.len(), "fetched html");

    Ok(FetchOutput::Html(HtmlPage {
        url_final: final_url,
        status,
        headers,
        body_utf8,
        charset: encoding.name(),
    }))
}

/// Reads a response body, giving up once it exceeds `limit` bytes.
///
/// A declared Content-Length over the limit is rejected before any of the
/// body is read.
pub async fn read_body(mut response: Response, limit: u64) -> Result<Vec<u8>, FetchError> {
    if let Some(content_length) = response.content_length()
        && content_length > limit
    {
        return Err(FetchError::BodyTooLarge(content_length));
    }

    let mut body = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| FetchError::Io(e.to_string()))?
    {
        let size = (body.len() + chunk.len()) as u64;
        if size > limit {
            return Err(FetchError::BodyTooLarge(size));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}
