pub mod activation;
pub mod generic_html;
pub mod open_graph;
pub mod wikipedia;

#[cfg(test)]
mod tests;

pub use activation::ActivationRule;
pub use generic_html::GenericHtmlProcessor;
pub use open_graph::OpenGraphProcessor;
pub use wikipedia::WikipediaProcessor;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::config::ProcessingOptions;
use crate::dom::Document;
use crate::preview::LinkPreview;

/// Everything a processor may look at while updating a preview.
pub struct ProcessingContext<'a> {
    pub url: &'a Url,
    /// `None` for non-HTML resources.
    pub document: Option<&'a Document>,
    pub options: &'a ProcessingOptions,
    /// Client for sub-requests. Only use it when
    /// `options.allow_additional_requests` is set.
    pub client: &'a Client,
}

/// A metadata extraction strategy.
///
/// Processors run one after another against the same preview. They never
/// fail: anything that goes wrong leaves the affected fields unset.
// Parsed documents are not `Sync`, so processor futures cannot be `Send`.
#[async_trait(?Send)]
pub trait MetadataProcessor: Send + Sync + 'static {
    /// Stable identity used for registration.
    fn id(&self) -> &'static str;

    fn activation_rule(&self) -> ActivationRule {
        ActivationRule::Always
    }

    async fn update_preview(&self, preview: &mut LinkPreview, cx: &ProcessingContext<'_>);
}
