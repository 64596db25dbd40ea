//! Link preview extraction.
//!
//! Fetch a page (or hand over HTML you already have), run it through an
//! ordered set of metadata processors, and get back a [`LinkPreview`]: title,
//! description, canonical URL, media URLs, favicon and any other namespaced
//! `<meta>` data the page declares.
//!
//! ```no_run
//! use unfurl::{LinkPreviewProvider, ProcessingOptions};
//!
//! # async fn run() -> Result<(), unfurl::LinkPreviewError> {
//! let provider = LinkPreviewProvider::new(ProcessingOptions::default())?;
//! let preview = provider.load("https://www.rust-lang.org").await?;
//! println!("{preview}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dom;
pub mod fetcher;
pub mod host;
pub mod preview;
pub mod processors;
pub mod provider;

pub use config::ProcessingOptions;
pub use preview::{LinkPreview, Property, PropertyName, PropertyValue, WriteMode};
pub use processors::{ActivationRule, MetadataProcessor, ProcessingContext};
pub use provider::{LinkPreviewError, LinkPreviewProvider, ProcessorRegistry};
