use async_trait::async_trait;
use std::fs;
use url::Url;

use crate::config::ProcessingOptions;
use crate::preview::{LinkPreview, TITLE};
use crate::processors::{
    ActivationRule, GenericHtmlProcessor, MetadataProcessor, OpenGraphProcessor,
    ProcessingContext,
};
use crate::provider::LinkPreviewProvider;

fn offline_provider() -> LinkPreviewProvider {
    let options = ProcessingOptions {
        allow_additional_requests: false,
        ..ProcessingOptions::default()
    };
    LinkPreviewProvider::new(options).unwrap()
}

fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

#[tokio::test]
async fn test_article_fixture() {
    let html = fs::read_to_string("src/processors/tests/fixtures/article.html")
        .expect("Failed to read test fixture");

    let preview = offline_provider()
        .load_html(&html, &url("https://example.com/articles/sample"))
        .await;

    // og:title beats the <title> fallback; twitter:* stays under its namespace
    assert_eq!(preview.title().as_deref(), Some("Sample Article"));
    assert_eq!(
        preview.description().as_deref(),
        Some("Fallback description from the plain meta tag.")
    );
    assert_eq!(
        preview.image_url().unwrap().as_str(),
        "https://example.com/images/sample.jpg"
    );
    assert_eq!(preview.metadata::<u32>("image", "width"), Some(1200));
    assert_eq!(preview.metadata::<u32>("image", "height"), Some(630));
    assert_eq!(
        preview.canonical_url().unwrap().as_str(),
        "https://example.com/articles/sample"
    );
    assert_eq!(
        preview.favicon_url().unwrap().as_str(),
        "https://example.com/apple-touch-icon.png"
    );

    let twitter = preview.property("twitter").unwrap();
    assert_eq!(twitter.content, None);
    assert_eq!(twitter.metadata["title"], "Twitter Title");
    assert_eq!(twitter.metadata["card"], "summary_large_image");
    assert_eq!(preview.property("card"), None);

    let article = preview.property("article").unwrap();
    assert_eq!(article.content, None);
    assert_eq!(article.metadata["author"], "Jane Doe");

    assert_eq!(
        preview.to_string(),
        [
            r#"description: "Fallback description from the plain meta tag.""#,
            r#"icon: "https://example.com/apple-touch-icon.png""#,
            r#"image: "/images/sample.jpg""#,
            "  alt: A sample image",
            "  height: 630",
            "  width: 1200",
            r#"site_name: "News Site""#,
            r#"title: "Sample Article""#,
            r#"url: "https://example.com/articles/sample""#,
        ]
        .join("\n")
    );
}

#[tokio::test]
async fn test_wikipedia_short_description_offline() {
    let html = fs::read_to_string("src/processors/tests/fixtures/wikipedia.html")
        .expect("Failed to read test fixture");

    let preview = offline_provider()
        .load_html(&html, &url("https://en.wikipedia.org/wiki/Italian_language"))
        .await;

    assert_eq!(preview.description().as_deref(), Some("Romance language"));
    assert_eq!(preview.title().as_deref(), Some("Italian language - Wikipedia"));
}

#[tokio::test]
async fn test_short_description_ignored_off_wikipedia() {
    let html = fs::read_to_string("src/processors/tests/fixtures/wikipedia.html")
        .expect("Failed to read test fixture");

    let preview = offline_provider()
        .load_html(&html, &url("https://mirror.example.com/wiki/Italian_language"))
        .await;

    assert_eq!(preview.description(), None);
}

#[tokio::test]
async fn test_og_title_with_description_fallback() {
    let preview = offline_provider()
        .load_html(
            r#"<head>
            <meta property="og:title" content="Title" />
            <meta name="description" content="Hello, world" />
            </head>"#,
            &url("https://example.com"),
        )
        .await;

    assert_eq!(preview.title().as_deref(), Some("Title"));
    assert_eq!(preview.description().as_deref(), Some("Hello, world"));
}

#[tokio::test]
async fn test_title_fallback() {
    let preview = offline_provider()
        .load_html(
            r#"<head>
            <title>Title</title>
            <meta name="description" content="Hello, world" />
            </head>"#,
            &url("https://example.com"),
        )
        .await;

    assert_eq!(preview.title().as_deref(), Some("Title"));
    assert_eq!(preview.description().as_deref(), Some("Hello, world"));
}

#[tokio::test]
async fn test_open_graph_wins_regardless_of_order() {
    let html = r#"<head><title>Plain</title><meta property="og:title" content="Graph"></head>"#;

    let mut provider = offline_provider();
    provider.unregister_processor(OpenGraphProcessor::ID);
    provider.register_processor(OpenGraphProcessor);
    assert_eq!(
        provider.registry().registered_ids(),
        vec!["generic_html", "wikipedia", "open_graph"]
    );

    let preview = provider.load_html(html, &url("https://example.com")).await;
    assert_eq!(preview.title().as_deref(), Some("Graph"));
}

#[tokio::test]
async fn test_non_og_namespace_does_not_override() {
    let html = r#"<head><title>Plain</title><meta name="twitter:title" content="Tweet"></head>"#;

    let mut provider = offline_provider();
    provider.unregister_processor(OpenGraphProcessor::ID);
    provider.register_processor(OpenGraphProcessor);

    let preview = provider.load_html(html, &url("https://example.com")).await;
    assert_eq!(preview.title().as_deref(), Some("Plain"));
}

struct HostSuffixProcessor;

#[async_trait(?Send)]
impl MetadataProcessor for HostSuffixProcessor {
    fn id(&self) -> &'static str {
        "host_suffix"
    }

    async fn update_preview(&self, preview: &mut LinkPreview, cx: &ProcessingContext<'_>) {
        let mut title = preview.title().unwrap_or_default();
        if let Some(host) = cx.url.host_str() {
            if !title.is_empty() {
                title.push_str(" • ");
            }
            title.push_str(host);
        }
        if !title.is_empty() {
            preview.set(TITLE, &title);
        }
    }
}

#[tokio::test]
async fn test_custom_processor_runs_after_defaults() {
    let mut provider = offline_provider();
    provider.register_processor(HostSuffixProcessor);
    provider.register_processor(HostSuffixProcessor);
    assert_eq!(provider.registry().registered_ids().len(), 4);

    let preview = provider
        .load_html(
            "<head><title>Example Domain</title></head>",
            &url("https://example.com"),
        )
        .await;

    assert_eq!(preview.title().as_deref(), Some("Example Domain • example.com"));
}

struct ExcludedProcessor;

#[async_trait(?Send)]
impl MetadataProcessor for ExcludedProcessor {
    fn id(&self) -> &'static str {
        "excluded"
    }

    fn activation_rule(&self) -> ActivationRule {
        ActivationRule::excludes(["example.com"])
    }

    async fn update_preview(&self, preview: &mut LinkPreview, _cx: &ProcessingContext<'_>) {
        preview.set(TITLE, &"overridden".to_string());
    }
}

#[tokio::test]
async fn test_activation_rule_skips_processor() {
    let mut provider = offline_provider();
    provider.register_processor(ExcludedProcessor);

    let html = "<head><title>Kept</title></head>";
    let skipped = provider.load_html(html, &url("https://www.example.com/")).await;
    assert_eq!(skipped.title().as_deref(), Some("Kept"));

    let ran = provider.load_html(html, &url("https://example.net/")).await;
    assert_eq!(ran.title().as_deref(), Some("overridden"));
}

#[tokio::test]
async fn test_resource_preview() {
    let provider = offline_provider();
    let image = url("https://cdn.example.com/photos/My%20Cat.JPG");

    let preview = provider.load_resource(&image, "Image/JPEG").await;
    assert_eq!(preview.canonical_url(), Some(image.clone()));
    assert_eq!(preview.image_url(), Some(image));
    assert_eq!(preview.video_url(), None);
    assert_eq!(preview.title().as_deref(), Some("My Cat.JPG"));

    let pdf = url("https://example.com/docs/report.pdf");
    let preview = provider.load_resource(&pdf, "application/pdf").await;
    assert_eq!(preview.canonical_url(), Some(pdf));
    assert_eq!(preview.image_url(), None);
    assert_eq!(preview.title().as_deref(), Some("report.pdf"));
}

#[tokio::test]
async fn test_generic_processor_alone() {
    let mut provider = offline_provider();
    provider.unregister_processor(OpenGraphProcessor::ID);
    assert!(provider.registry().contains(GenericHtmlProcessor::ID));

    let preview = provider
        .load_html(
            r#"<head><meta property="og:title" content="Ignored"><title>Only Title</title></head>"#,
            &url("https://example.com"),
        )
        .await;
    assert_eq!(preview.title().as_deref(), Some("Only Title"));
    assert!(preview.property("image").is_none());
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_load_html_never_panics(
            html in ".*",
            path in "[a-z/]*"
        ) {
            let page = url(&format!("https://en.wikipedia.org/{path}"));
            let rt = tokio::runtime::Runtime::new().unwrap();
            let _ = rt.block_on(offline_provider().load_html(&html, &page));
        }

        #[test]
        fn test_meta_soup_never_panics(
            key in "[a-z:]{0,12}",
            content in ".*",
        ) {
            let html = format!(r#"<meta property="{key}" content="{content}"><meta name="{key}" content="x">"#);
            let rt = tokio::runtime::Runtime::new().unwrap();
            let preview = rt.block_on(offline_provider().load_html(&html, &url("https://example.com")));
            let _ = preview.to_string();
        }
    }
}
