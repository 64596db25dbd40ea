use thiserror::Error;

use crate::fetcher::FetchError;

/// Failures that abort an extraction. Processor-level problems never show
/// up here; they only leave fields unset.
#[derive(Error, Debug)]
pub enum LinkPreviewError {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("extraction cancelled")]
    Cancelled,
}
