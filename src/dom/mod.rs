//! Read-only query layer over a parsed HTML document.
//!
//! Processors only need a handful of operations: select by CSS selector,
//! read an attribute, read an attribute as an absolute URL, and read text.
//! [`Document`] provides exactly those on top of `scraper`, resolving
//! relative URLs against the document base (the page URL, or a `<base href>`
//! when the page declares one).

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use url::Url;

static BASE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("base[href]").unwrap());

pub struct Document {
    html: Html,
    base_url: Url,
}

impl Document {
    /// Parses `html` fetched from `url`. Parsing is tolerant and never fails.
    pub fn parse(html: &str, url: &Url) -> Self {
        let html = Html::parse_document(html);
        let base_url = html
            .select(&BASE_SELECTOR)
            .next()
            .and_then(|base| base.value().attr("href"))
            .and_then(|href| url.join(href.trim()).ok())
            .unwrap_or_else(|| url.clone());
        Self { html, base_url }
    }

    /// URL that relative references resolve against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Elements matching `selector`, in document order.
    pub fn select<'a>(&'a self, selector: &'a Selector) -> impl Iterator<Item = Node<'a>> + 'a {
        self.html.select(selector).map(move |element| Node {
            element,
            base_url: &self.base_url,
        })
    }

    /// Like [`Document::select`] for a selector string. An invalid selector
    /// matches nothing.
    pub fn select_str(&self, selector: &str) -> Vec<Node<'_>> {
        match Selector::parse(selector) {
            Ok(selector) => self
                .html
                .select(&selector)
                .map(|element| Node {
                    element,
                    base_url: &self.base_url,
                })
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Text of every element matching `selector`, space-joined.
    pub fn text(&self, selector: &Selector) -> String {
        self.select(selector)
            .map(|node| node.text())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Clone, Copy)]
pub struct Node<'a> {
    element: ElementRef<'a>,
    base_url: &'a Url,
}

impl<'a> Node<'a> {
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Attribute value resolved against the document base.
    pub fn abs_url(&self, name: &str) -> Option<Url> {
        let raw = self.attr(name)?.trim();
        if raw.is_empty() {
            return None;
        }
        self.base_url.join(raw).ok()
    }

    /// Text content with whitespace runs collapsed.
    pub fn text(&self) -> String {
        let raw = self.element.text().collect::<String>();
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}
