//! Runs the registered processors against one shared preview.
//!
//! Processors run strictly in registration order. Later processors see, and
//! may depend on, what earlier ones wrote, so nothing here runs
//! concurrently. Each processor may await its own sub-requests; dropping the
//! extraction future drops those requests with it.

pub mod errors;
pub mod registry;

pub use errors::LinkPreviewError;
pub use registry::ProcessorRegistry;

use percent_encoding::percent_decode_str;
use reqwest::{Client, header::HeaderMap};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::ProcessingOptions;
use crate::dom::Document;
use crate::fetcher::{self, FetchOutput};
use crate::preview::{AUDIO_URL, CANONICAL_URL, IMAGE_URL, LinkPreview, TITLE, VIDEO_URL};
use crate::processors::{MetadataProcessor, ProcessingContext};

/// Loads URLs (or already-fetched content) and extracts link previews.
///
/// Registration is meant to happen during setup; the provider takes
/// `&mut self` for it and `&self` for extraction.
#[derive(Clone)]
pub struct LinkPreviewProvider {
    client: Client,
    registry: ProcessorRegistry,
    options: ProcessingOptions,
}

impl LinkPreviewProvider {
    pub fn new(options: ProcessingOptions) -> Result<Self, LinkPreviewError> {
        Ok(Self::with_client(fetcher::build_client()?, options))
    }

    pub fn with_client(client: Client, options: ProcessingOptions) -> Self {
        Self {
            client,
            registry: ProcessorRegistry::with_defaults(),
            options,
        }
    }

    pub fn options(&self) -> &ProcessingOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut ProcessingOptions {
        &mut self.options
    }

    /// Appends a processor; a no-op if its id is already registered.
    pub fn register_processor<P: MetadataProcessor>(&mut self, processor: P) {
        if !self.registry.register(processor) {
            debug!("processor already registered");
        }
    }

    /// Removes a processor by id; a no-op if it is not registered.
    pub fn unregister_processor(&mut self, id: &str) {
        self.registry.unregister(id);
    }

    pub fn registry(&self) -> &ProcessorRegistry {
        &self.registry
    }

    pub async fn load(&self, url: &str) -> Result<LinkPreview, LinkPreviewError> {
        self.load_with_headers(url, HeaderMap::new()).await
    }

    /// Fetches `url` with extra request headers and extracts a preview.
    #[instrument(skip_all, fields(url = %url))]
    pub async fn load_with_headers(
        &self,
        url: &str,
        headers: HeaderMap,
    ) -> Result<LinkPreview, LinkPreviewError> {
        let url = Url::parse(url)?;

        let output = fetcher::fetch(&self.client, &url, headers, &self.options)
            .await
            .inspect_err(|e| warn!(error = %e, "fetch failed"))?;

        match output {
            FetchOutput::Html(page) => Ok(self.load_html(&page.body_utf8, &page.url_final).await),
            FetchOutput::Resource { url, content_type } => {
                Ok(self.load_resource(&url, &content_type).await)
            }
        }
    }

    /// Like [`load_with_headers`](Self::load_with_headers), but gives up with
    /// [`LinkPreviewError::Cancelled`] once `token` is cancelled. Pending
    /// requests, including processor sub-requests, are dropped.
    pub async fn load_cancellable(
        &self,
        url: &str,
        headers: HeaderMap,
        token: &CancellationToken,
    ) -> Result<LinkPreview, LinkPreviewError> {
        tokio::select! {
            biased;
            _ = token.cancelled() => Err(LinkPreviewError::Cancelled),
            result = self.load_with_headers(url, headers) => result,
        }
    }

    /// Extracts a preview from HTML that was fetched from `url`.
    pub async fn load_html(&self, html: &str, url: &Url) -> LinkPreview {
        let document = Document::parse(html, url);
        let mut preview = LinkPreview::new(url.clone());
        self.run_processors(&mut preview, url, Some(&document)).await;
        preview
    }

    /// Builds a preview for a non-HTML resource (an image, a PDF, ...).
    pub async fn load_resource(&self, url: &Url, content_type: &str) -> LinkPreview {
        let mut preview = LinkPreview::new(url.clone());
        preview.fill(CANONICAL_URL, url);

        let content_type = content_type.to_ascii_lowercase();
        for (needle, name) in [("image", IMAGE_URL), ("video", VIDEO_URL), ("audio", AUDIO_URL)] {
            if content_type.contains(needle) {
                preview.fill(name, url);
            }
        }

        if let Some(file_name) = url
            .path_segments()
            .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
        {
            let title = percent_decode_str(file_name).decode_utf8_lossy().into_owned();
            preview.fill(TITLE, &title);
        }

        self.run_processors(&mut preview, url, None).await;
        preview
    }

    async fn run_processors(
        &self,
        preview: &mut LinkPreview,
        url: &Url,
        document: Option<&Document>,
    ) {
        let cx = ProcessingContext {
            url,
            document,
            options: &self.options,
            client: &self.client,
        };

        for processor in self.registry.iter() {
            if !processor.activation_rule().applies_to(url) {
                debug!(processor = processor.id(), "skipped by activation rule");
                continue;
            }
            debug!(processor = processor.id(), "running");
            processor.update_preview(preview, &cx).await;
        }
    }
}
