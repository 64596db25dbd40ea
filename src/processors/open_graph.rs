use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::Selector;
use tracing::debug;

use crate::dom::Node;
use crate::preview::{LinkPreview, Property, WriteMode};
use crate::processors::{MetadataProcessor, ProcessingContext};

static META_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("meta").unwrap());

const OPEN_GRAPH_NAMESPACE: &str = "og";

/// Reads namespaced `<meta>` tags (`og:title`, `og:image:width`,
/// `twitter:title`, `article:author`, ...).
///
/// `og:` tags are authoritative and overwrite earlier values. Every other
/// namespace only fills gaps.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenGraphProcessor;

impl OpenGraphProcessor {
    pub const ID: &'static str = "open_graph";
}

#[async_trait(?Send)]
impl MetadataProcessor for OpenGraphProcessor {
    fn id(&self) -> &'static str {
        Self::ID
    }

    async fn update_preview(&self, preview: &mut LinkPreview, cx: &ProcessingContext<'_>) {
        let Some(document) = cx.document else {
            return;
        };

        let mut written = 0usize;
        for tag in document.select(&META_SELECTOR) {
            if let Some((property, mode)) = parse_meta_tag(&tag) {
                preview.set_property(property, mode);
                written += 1;
            }
        }
        debug!(written, "namespaced meta tags");
    }
}

/// Turns one `<meta>` tag into a property write, or `None` if the tag is not
/// a namespaced field with content.
fn parse_meta_tag(tag: &Node<'_>) -> Option<(Property, WriteMode)> {
    let key = tag
        .attr("property")
        .filter(|value| !value.is_empty())
        .or_else(|| tag.attr("name"))?;

    let mut segments = key.split(':').filter(|segment| !segment.is_empty()).peekable();
    let namespace = *segments.peek()?;
    let is_open_graph = namespace == OPEN_GRAPH_NAMESPACE;
    if is_open_graph {
        segments.next();
    }

    let rest: Vec<&str> = segments.collect();
    // A bare `og` or an un-namespaced name such as `description`.
    let min_len = if is_open_graph { 1 } else { 2 };
    if rest.len() < min_len {
        return None;
    }

    let content = tag.attr("content")?;
    let property = Property::new(rest[0]);
    let property = match rest.get(1) {
        None => property.with_content(content),
        Some(sub_key) => property.with_metadata(*sub_key, content),
    };
    Some((property, WriteMode::authoritative(is_open_graph)))
}
