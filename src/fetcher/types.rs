use reqwest::{StatusCode, header::HeaderMap};
use url::Url;

/// What the primary fetch produced.
#[derive(Debug)]
pub enum FetchOutput {
    /// A `text/html` response, decoded to UTF-8.
    Html(HtmlPage),
    /// Any other content type. The body is not read.
    Resource { url: Url, content_type: String },
}

impl FetchOutput {
    /// Final URL after redirects.
    pub fn url(&self) -> &Url {
        match self {
            Self::Html(page) => &page.url_final,
            Self::Resource { url, .. } => url,
        }
    }
}

#[derive(Debug)]
pub struct HtmlPage {
    pub url_final: Url,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body_utf8: String,
    /// Name of the encoding the body was decoded from.
    pub charset: &'static str,
}
